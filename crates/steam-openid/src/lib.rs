//! # Steam OpenID 2.0 Authentication
//!
//! This crate implements the relying-party side of OpenID 2.0 authentication using Steam as the
//! provider ("Sign in through Steam").
//!
//! The flow looks like this:
//!
//! 1. [`Client::login_url()`] produces a URL you redirect your users to.
//! 2. Steam redirects the user back to your callback URL; pass the full URL to
//!    [`Client::parse_callback()`] to validate its shape and extract the user's SteamID.
//! 3. Confirm the signed assertion with Steam via [`Client::verify()`] (or build the request
//!    yourself with [`Client::verification_url()`] and decode the response with
//!    [`Client::check_authentication()`]).
//!
//! Outbound HTTP is abstracted behind the [`Fetch`] trait. Enable the `reqwest` feature for a
//! ready-made implementation.

#[macro_use(Debug, Display, From, Error)]
extern crate derive_more as _;

pub use self::{
	cache::ResourceCache,
	callback::{LoginResult, LoginStatus, parse_callback},
	client::{Client, VerifyError},
	error::{BuildUrlError, Cancelled, ConfigError},
	fetch::Fetch,
	realm::RealmConfig,
	resource::Resource,
	steam_id::{AccountType, NotAnIndividual, ParseSteamIdError, SteamId, is_individual_steam64},
	verification::{AuthenticationVerdict, KeyValues, Verification, parse_verification},
};

#[cfg(feature = "reqwest")]
pub use self::fetch::ReqwestFetcher;

pub mod discovery;
pub mod urls;

mod cache;
mod callback;
mod client;
mod error;
mod fetch;
mod realm;
mod resource;
mod steam_id;
mod verification;

/// URL of Steam's XRDS document used for provider discovery.
pub const DISCOVERY_URL: &str = "https://steamcommunity.com/openid";

/// Prefix of the `openid.claimed_id` Steam sends back; the user's SteamID follows it.
pub const CLAIMED_ID_PREFIX: &str = "https://steamcommunity.com/openid/id/";
