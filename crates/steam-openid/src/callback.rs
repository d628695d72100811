//! Validation of the callback Steam redirects users to after signing in.

use std::borrow::Cow;

use url::Url;

use crate::{CLAIMED_ID_PREFIX, SteamId};

/// Outcome of a login attempt, as reported by the callback.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStatus
{
	/// The callback is well-formed and names an individual's SteamID.
	///
	/// This does **not** mean the assertion was signed by Steam; that still has to be confirmed
	/// with a `check_authentication` request.
	Success,

	/// The user cancelled the login.
	Cancelled,

	/// Steam reported an error.
	Error,

	/// The callback was malformed.
	InvalidResponse,
}

/// The decoded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult
{
	status: LoginStatus,
	steam64: u64,
	error: Option<Cow<'static, str>>,
	handle: Option<String>,
}

impl LoginResult
{
	const CANCELLED: Self = Self {
		status: LoginStatus::Cancelled,
		steam64: 0,
		error: Some(Cow::Borrowed("cancelled")),
		handle: None,
	};

	fn success(steam_id: SteamId, handle: String) -> Self
	{
		Self { status: LoginStatus::Success, steam64: steam_id.as_u64(), error: None, handle: Some(handle) }
	}

	fn failure(
		status: LoginStatus,
		error: impl Into<Cow<'static, str>>,
		handle: Option<&str>,
	) -> Self
	{
		Self { status, steam64: 0, error: Some(error.into()), handle: handle.map(str::to_owned) }
	}

	fn invalid(error: impl Into<Cow<'static, str>>, handle: Option<&str>) -> Self
	{
		Self::failure(LoginStatus::InvalidResponse, error, handle)
	}

	pub fn status(&self) -> LoginStatus
	{
		self.status
	}

	pub fn is_success(&self) -> bool
	{
		self.status == LoginStatus::Success
	}

	/// The user's 64-bit SteamID, or `0` if the login was not successful.
	pub fn steam64(&self) -> u64
	{
		self.steam64
	}

	/// The user's SteamID, if the login was successful.
	pub fn steam_id(&self) -> Option<SteamId>
	{
		self.is_success().then(|| SteamId::from_u64(self.steam64).ok()).flatten()
	}

	/// Human-readable reason for an unsuccessful login.
	pub fn error(&self) -> Option<&str>
	{
		self.error.as_deref()
	}

	/// The `openid.assoc_handle` (or `openid.invalidate_handle`) Steam sent.
	///
	/// If the login failed, this handle should be invalidated.
	pub fn handle(&self) -> Option<&str>
	{
		self.handle.as_deref()
	}
}

/// Decoded query parameters.
///
/// Values of a repeated key are joined with `,`, so a duplicated `claimed_id` or `return_to`
/// never matches what we expect.
struct Params<'a>(Vec<(Cow<'a, str>, Cow<'a, str>)>);

impl<'a> Params<'a>
{
	fn new(url: &'a Url) -> Self
	{
		let mut params = Vec::<(Cow<'a, str>, Cow<'a, str>)>::new();

		for (key, value) in url.query_pairs() {
			match params.iter_mut().find(|(name, _)| *name == key) {
				Some((_, joined)) => {
					let joined = joined.to_mut();
					joined.push(',');
					joined.push_str(&value);
				},
				None => params.push((key, value)),
			}
		}

		Self(params)
	}

	fn get(&self, key: &str) -> Option<&str>
	{
		self.0
			.iter()
			.find(|(name, _)| name == key)
			.map(|(_, value)| &**value)
	}

	fn get_non_empty(&self, key: &str) -> Option<&str>
	{
		self.get(key).filter(|value| !value.is_empty())
	}
}

/// Validates the URL Steam redirected the user to and extracts their SteamID.
///
/// `expected_callback` is the callback URL that was used to build the login URL; the
/// `openid.return_to` parameter has to match it exactly.
///
/// This never fails: malformed input is reported as [`LoginStatus::InvalidResponse`]. Only the
/// shape of the callback is checked, the signature is not.
#[tracing::instrument(level = "trace", skip_all, fields(url = url.as_str()), ret(level = "debug"))]
pub fn parse_callback(expected_callback: &str, url: &Url) -> LoginResult
{
	let params = Params::new(url);
	let handle = params
		.get("openid.assoc_handle")
		.or_else(|| params.get("openid.invalidate_handle"));

	let mode = params.get("openid.mode");

	if mode != Some("id_res") {
		return match mode {
			Some("cancel") => LoginResult::CANCELLED,
			Some("error") => LoginResult::failure(
				LoginStatus::Error,
				params.get("openid.error").unwrap_or("Unknown error").to_owned(),
				handle,
			),
			_ => LoginResult::invalid(format!("Invalid mode: {}", mode.unwrap_or_default()), handle),
		};
	}

	let return_to = params.get("openid.return_to");

	if return_to != Some(expected_callback) {
		return LoginResult::invalid(
			format!("Mismatched return_to: {}", return_to.unwrap_or_default()),
			handle,
		);
	}

	if params.get_non_empty("openid.response_nonce").is_none() {
		return LoginResult::invalid("Missing nonce", handle);
	}

	if params.get_non_empty("openid.signed").is_none() {
		return LoginResult::invalid("Missing signed", handle);
	}

	if params.get_non_empty("openid.sig").is_none() {
		return LoginResult::invalid("Missing sig", handle);
	}

	let Some(handle) = handle.filter(|handle| !handle.is_empty()) else {
		return LoginResult::invalid("Missing assoc_handle", handle);
	};

	let Some(claimed_id) = params.get("openid.claimed_id") else {
		return LoginResult::invalid("Missing claimed_id", Some(handle));
	};

	let Some(raw_steam_id) = claimed_id.strip_prefix(CLAIMED_ID_PREFIX) else {
		return LoginResult::invalid(format!("Invalid claimed_id: {claimed_id}"), Some(handle));
	};

	match raw_steam_id.parse::<u64>().map(SteamId::from_u64) {
		Ok(Ok(steam_id)) => LoginResult::success(steam_id, handle.to_owned()),
		Ok(Err(_)) | Err(_) => LoginResult::invalid(
			format!("Invalid Individual Steam64 ID: {raw_steam_id}"),
			Some(handle),
		),
	}
}
