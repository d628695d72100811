//! Decoding of `check_authentication` responses.

use std::collections::HashMap;

/// Steam's answer to a `check_authentication` request.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationVerdict
{
	/// The assertion carries a valid signature.
	Valid,

	/// The assertion's signature is invalid.
	Invalid,

	/// Steam asked us to invalidate the association handle; the login must be rejected even if
	/// the signature was valid.
	Reject,

	/// The response could not be understood.
	InvalidResponse,
}

/// A decoded `check_authentication` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification
{
	pub verdict: AuthenticationVerdict,

	/// Handle Steam asked us to invalidate, if any.
	pub invalidate_handle: Option<String>,
}

impl Verification
{
	pub fn is_valid(&self) -> bool
	{
		self.verdict == AuthenticationVerdict::Valid
	}
}

/// Key-Value Form Encoding as used by OpenID 2.0 direct responses.
///
/// Each line holds a `key:value` pair (an optional space after the colon is stripped, as is a
/// trailing carriage return). Lines without a colon or with an empty value are skipped. If a key
/// occurs more than once, the last occurrence wins.
#[derive(Debug, Default)]
pub struct KeyValues<'a>
{
	pairs: HashMap<&'a str, &'a str>,
}

impl<'a> KeyValues<'a>
{
	pub fn parse(text: &'a str) -> Self
	{
		let pairs = text
			.split('\n')
			.map(|line| line.strip_suffix('\r').unwrap_or(line))
			.filter_map(|line| line.split_once(':'))
			.map(|(key, value)| (key, value.strip_prefix(' ').unwrap_or(value)))
			.filter(|(_, value)| !value.is_empty())
			.collect();

		Self { pairs }
	}

	pub fn get(&self, key: &str) -> Option<&'a str>
	{
		self.pairs.get(key).copied()
	}
}

/// Decodes the plain-text response of a `check_authentication` request.
///
/// A non-empty `invalidate_handle` always turns the verdict into [`Reject`], regardless of
/// `is_valid`.
///
/// [`Reject`]: AuthenticationVerdict::Reject
#[tracing::instrument(level = "trace", ret(level = "debug"))]
pub fn parse_verification(text: &str) -> Verification
{
	let key_values = KeyValues::parse(text);
	let invalidate_handle = key_values.get("invalidate_handle").map(str::to_owned);
	let must_reject = invalidate_handle.is_some();

	let verdict = match key_values.get("is_valid") {
		Some(is_valid) if is_valid.eq_ignore_ascii_case("true") => {
			if must_reject {
				AuthenticationVerdict::Reject
			} else {
				AuthenticationVerdict::Valid
			}
		},
		Some(is_valid) if is_valid.eq_ignore_ascii_case("false") => {
			if must_reject {
				AuthenticationVerdict::Reject
			} else {
				AuthenticationVerdict::Invalid
			}
		},
		Some(_) | None => AuthenticationVerdict::InvalidResponse,
	};

	Verification { verdict, invalidate_handle }
}
