use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct TracingConfig
{
	/// Filter used when `RUST_LOG` is not set.
	#[serde(default = "default_level")]
	pub level: Box<str>,

	/// Emit JSON instead of human-readable logs.
	pub json: bool,

	#[serde(default = "default_ansi")]
	pub ansi: bool,
}

impl Default for TracingConfig
{
	fn default() -> Self
	{
		Self { level: default_level(), json: false, ansi: default_ansi() }
	}
}

fn default_level() -> Box<str>
{
	Box::from("info")
}

fn default_ansi() -> bool
{
	true
}
