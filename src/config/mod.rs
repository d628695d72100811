#![allow(
	missing_copy_implementations,
	reason = "configs won't be copied around"
)]

mod http;
mod openid;
mod tracing;

use std::{fs, io, path::Path};

use color_eyre::{
	Section,
	eyre::{self, WrapErr},
};
use serde::Deserialize;

pub(crate) use self::{http::HttpConfig, openid::OpenIdConfig, tracing::TracingConfig};

/// Where the configuration file is looked for if `--config` was not passed.
pub(crate) const DEFAULT_PATH: &str = "steam-oid2-login.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct Config
{
	pub http: HttpConfig,
	pub openid: OpenIdConfig,
	pub tracing: TracingConfig,
}

impl Config
{
	pub(crate) fn load_from_file(path: impl AsRef<Path>) -> eyre::Result<Self>
	{
		let file = fs::read_to_string(path.as_ref())
			.wrap_err_with(|| format!("failed to read configuration file at {:?}", path.as_ref()))
			.suggestion("create the file or run with `--config` to specify an alternative path")?;

		Self::parse(&file)
	}

	/// Loads the file at [`DEFAULT_PATH`], falling back to the defaults if it does not exist.
	pub(crate) fn load_default() -> eyre::Result<Self>
	{
		match fs::read_to_string(DEFAULT_PATH) {
			Ok(file) => Self::parse(&file),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
			Err(err) => Err(err)
				.wrap_err_with(|| format!("failed to read configuration file at {DEFAULT_PATH:?}")),
		}
	}

	fn parse(file: &str) -> eyre::Result<Self>
	{
		toml::from_str(file).wrap_err("failed to parse configuration file")
	}
}
