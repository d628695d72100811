//! Construction of the outbound OpenID URLs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::{BuildUrlError, RealmConfig, Resource};

/// The OpenID 2.0 namespace.
pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";

/// Lets the provider pick the identity of whoever signs in.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// `openid.mode` for verification requests.
pub const CHECK_AUTHENTICATION: &str = "check_authentication";

/// Everything except RFC 3986 "unreserved" characters gets encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Builds the URL users are redirected to in order to sign in on Steam.
///
/// The query parameters are emitted in a fixed order and `realm` / `callback_url` are inserted
/// as-is.
///
/// # Errors
///
/// Fails before touching the endpoint if `callback_url` does not start with `realm`.
#[tracing::instrument(level = "trace", skip(resource), ret(Display, level = "debug"), err(level = "debug"))]
pub fn login_url(realm: &str, callback_url: &str, resource: &Resource) -> Result<Url, BuildUrlError>
{
	RealmConfig::validate(realm, callback_url)?;

	let url = format!(
		"{endpoint}?openid.ns={OPENID_NS}\
		 &openid.claimed_id={IDENTIFIER_SELECT}\
		 &openid.identity={IDENTIFIER_SELECT}\
		 &openid.mode=checkid_setup\
		 &openid.realm={realm}\
		 &openid.return_to={callback_url}",
		endpoint = resource.endpoint_url(),
	);

	Url::parse(&url).map_err(BuildUrlError::InvalidUrl)
}

/// Builds the `check_authentication` URL for a callback Steam redirected the user to.
///
/// Every query parameter of `callback_url` is re-emitted against the provider endpoint in its
/// original order (repeated keys included), except that the value of `openid.mode` becomes
/// `check_authentication`. Values are percent-encoded, and an existing query on the endpoint is
/// kept.
#[tracing::instrument(
	level = "trace",
	skip_all,
	fields(callback_url = callback_url.as_str()),
	ret(Display, level = "debug"),
	err(level = "debug"),
)]
pub fn verification_url(resource: &Resource, callback_url: &Url) -> Result<Url, BuildUrlError>
{
	let mut url = String::from(resource.endpoint_url());
	let mut separator = if url.contains('?') { '&' } else { '?' };

	for (key, value) in callback_url.query_pairs() {
		url.push(separator);
		separator = '&';
		url.extend(utf8_percent_encode(&key, QUERY_VALUE));
		url.push('=');

		if key == "openid.mode" {
			url.push_str(CHECK_AUTHENTICATION);
		} else {
			url.extend(utf8_percent_encode(&value, QUERY_VALUE));
		}
	}

	Url::parse(&url).map_err(BuildUrlError::InvalidUrl)
}
