use std::borrow::Cow;

/// An OpenID provider endpoint, as discovered from the provider's XRDS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource
{
	protocol_version: Cow<'static, str>,
	endpoint_url: Cow<'static, str>,
}

impl Resource
{
	/// Used whenever discovery is unavailable or fails.
	pub const FALLBACK: Self = Self {
		protocol_version: Cow::Borrowed("http://specs.openid.net/auth/2.0/server"),
		endpoint_url: Cow::Borrowed("https://steamcommunity.com/openid/login"),
	};

	/// Creates a new [`Resource`].
	pub fn new(
		protocol_version: impl Into<Cow<'static, str>>,
		endpoint_url: impl Into<Cow<'static, str>>,
	) -> Self
	{
		Self { protocol_version: protocol_version.into(), endpoint_url: endpoint_url.into() }
	}

	/// The OpenID service type, e.g. `http://specs.openid.net/auth/2.0/server`.
	pub fn protocol_version(&self) -> &str
	{
		&self.protocol_version
	}

	/// The OP endpoint URL users are redirected to.
	pub fn endpoint_url(&self) -> &str
	{
		&self.endpoint_url
	}
}
