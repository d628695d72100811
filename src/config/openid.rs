use serde::Deserialize;

/// Identity of this site towards Steam.
///
/// The callback URL has to live under the realm; this is checked on startup.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct OpenIdConfig
{
	#[serde(default = "default_realm")]
	pub realm: Box<str>,

	#[serde(default = "default_callback_url")]
	pub callback_url: Box<str>,
}

impl Default for OpenIdConfig
{
	fn default() -> Self
	{
		Self { realm: default_realm(), callback_url: default_callback_url() }
	}
}

fn default_realm() -> Box<str>
{
	Box::from("http://localhost:8001/")
}

fn default_callback_url() -> Box<str>
{
	Box::from("http://localhost:8001/openid/login")
}
