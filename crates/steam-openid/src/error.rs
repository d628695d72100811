/// Error returned when realm / callback configuration is missing or inconsistent.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("invalid openid configuration: {_variant}")]
pub enum ConfigError
{
	/// No realm was configured and none was passed to the call.
	#[display("no realm configured")]
	MissingRealm,

	/// No callback URL was configured and none was passed to the call.
	#[display("no callback url configured")]
	MissingCallback,

	/// The realm was an empty string.
	#[display("realm must not be empty")]
	EmptyRealm,

	/// The callback URL does not start with the realm.
	#[display("callback url must start with the realm")]
	CallbackOutsideRealm,
}

/// Error returned when an operation was cancelled through its cancellation token.
///
/// This is an execution outcome and unrelated to [`LoginStatus::Cancelled`], which means the
/// user aborted the login on Steam's side.
///
/// [`LoginStatus::Cancelled`]: crate::LoginStatus::Cancelled
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("operation was cancelled")]
pub struct Cancelled;

/// Error returned when building one of the outbound OpenID URLs.
#[derive(Debug, Display, Error, From)]
pub enum BuildUrlError
{
	/// Realm / callback configuration was invalid.
	#[display("{_0}")]
	Config(ConfigError),

	/// Resolving the provider endpoint was cancelled.
	#[display("{_0}")]
	Cancelled(Cancelled),

	/// The provider endpoint did not form a valid URL.
	#[display("failed to build url: {_0}")]
	InvalidUrl(url::ParseError),
}
