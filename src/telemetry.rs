use std::io;

use color_eyre::eyre::{self, WrapErr};
use tracing_subscriber::{
	EnvFilter,
	Layer,
	fmt::time::UtcTime,
	layer::SubscriberExt,
	util::SubscriberInitExt,
};

use crate::config::TracingConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub(crate) fn init(config: &TracingConfig) -> eyre::Result<()>
{
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&*config.level))
		.wrap_err_with(|| format!("invalid log filter {:?}", config.level))?;

	let pretty_layer = (!config.json).then(|| {
		tracing_subscriber::fmt::layer()
			.pretty()
			.with_ansi(config.ansi)
			.with_writer(io::stderr)
			.with_timer(UtcTime::rfc_3339())
	});

	let json_layer = config.json.then(|| {
		tracing_subscriber::fmt::layer()
			.json()
			.with_file(false)
			.with_line_number(false)
			.with_span_list(true)
			.with_writer(io::stderr)
			.with_timer(UtcTime::rfc_3339())
	});

	tracing_subscriber::registry()
		.with(Layer::and_then(pretty_layer, json_layer).with_filter(filter))
		.try_init()
		.wrap_err("failed to install tracing subscriber")
}
