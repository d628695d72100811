use std::{
	net::{IpAddr, Ipv4Addr, SocketAddr},
	time::Duration,
};

use serde::{Deserialize, Deserializer, de};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct HttpConfig
{
	#[serde(default = "default_ip_addr")]
	pub ip_addr: IpAddr,

	#[serde(default = "default_port")]
	pub port: u16,

	/// Timeout for requests to Steam (in seconds).
	#[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
	pub timeout: Duration,
}

impl HttpConfig
{
	pub(crate) fn socket_addr(&self) -> SocketAddr
	{
		SocketAddr::new(self.ip_addr, self.port)
	}
}

impl Default for HttpConfig
{
	fn default() -> Self
	{
		Self { ip_addr: default_ip_addr(), port: default_port(), timeout: default_timeout() }
	}
}

fn default_ip_addr() -> IpAddr
{
	IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16
{
	8001
}

fn default_timeout() -> Duration
{
	Duration::from_secs(5)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	let secs = f64::deserialize(deserializer)?;

	Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
}
