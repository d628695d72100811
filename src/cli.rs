use std::{net::IpAddr, path::Path};

use crate::config::Config;

pub(crate) fn args() -> Args
{
	<Args as clap::Parser>::parse()
}

/// Sign in through Steam.
#[derive(Debug, clap::Parser)]
pub(crate) struct Args
{
	/// Path to the configuration file
	#[arg(long = "config")]
	pub config_path: Option<Box<Path>>,

	/// The IP address the server should listen on
	#[arg(long = "ip")]
	pub ip_addr: Option<IpAddr>,

	/// The port the server should listen on
	#[arg(long)]
	pub port: Option<u16>,

	/// The OpenID realm shown to users on Steam's login page
	#[arg(long, env = "STEAM_OPENID_REALM")]
	pub realm: Option<String>,

	/// The URL Steam redirects users back to; must start with the realm
	#[arg(long, env = "STEAM_OPENID_CALLBACK_URL")]
	pub callback_url: Option<String>,
}

impl Args
{
	/// Overrides values loaded from the configuration file.
	pub(crate) fn apply_to_config(self, config: &mut Config)
	{
		if let Some(ip_addr) = self.ip_addr {
			config.http.ip_addr = ip_addr;
		}

		if let Some(port) = self.port {
			config.http.port = port;
		}

		if let Some(realm) = self.realm {
			config.openid.realm = realm.into_boxed_str();
		}

		if let Some(callback_url) = self.callback_url {
			config.openid.callback_url = callback_url.into_boxed_str();
		}
	}
}
