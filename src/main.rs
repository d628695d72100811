//! steam-oid2-login - sign in through Steam.
//! Copyright (C) 2024  AlphaKeks <alphakeks@dawn>
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program. If not, see https://www.gnu.org/licenses.

#[macro_use(Debug)]
extern crate derive_more as _;

use std::{error::Error, future, sync::Arc};

use color_eyre::{
	Section,
	eyre::{self, WrapErr},
};
use steam_openid::{Client, RealmConfig, ReqwestFetcher};
use tokio::net::TcpListener;
use url::Url;

mod cli;
mod config;
mod http;
mod task_manager;
mod telemetry;

use self::{config::Config, task_manager::TaskManager};

#[tokio::main]
async fn main() -> eyre::Result<()>
{
	color_eyre::install()?;

	match dotenvy::dotenv() {
		Ok(_) => {},
		Err(err) if err.not_found() => {},
		Err(err) => return Err(err).wrap_err("failed to load `.env` file"),
	}

	let args = cli::args();
	let mut config = match args.config_path.as_deref() {
		Some(path) => Config::load_from_file(path)?,
		None => Config::load_default()?,
	};

	args.apply_to_config(&mut config);
	telemetry::init(&config.tracing)?;
	tracing::debug!(?config, "loaded configuration");

	let callback_url = config
		.openid
		.callback_url
		.parse::<Url>()
		.wrap_err_with(|| format!("invalid callback url {:?}", config.openid.callback_url))?;

	if callback_url.path() == "/" {
		return Err(eyre::eyre!("the callback url cannot point to `/`"))
			.suggestion("use a dedicated path such as `/openid/login`");
	}

	let realm_config = RealmConfig::new(config.openid.realm, config.openid.callback_url)
		.wrap_err("invalid openid configuration")
		.suggestion("the callback url has to start with the realm")?;

	let fetcher = ReqwestFetcher::with_timeout(config.http.timeout)
		.wrap_err("failed to build http client")?;

	let client = Arc::new(Client::builder().fetcher(fetcher).config(realm_config).build());
	let tasks = TaskManager::default();
	let router = http::router(client, callback_url, tasks.clone());

	let listener = TcpListener::bind(config.http.socket_addr())
		.await
		.wrap_err_with(|| format!("failed to bind {}", config.http.socket_addr()))?;

	tracing::info!(addr = %listener.local_addr()?, "listening for requests");

	axum::serve(listener, router)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.wrap_err("failed to run server")?;

	tasks.shutdown().await;

	Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
///
/// A signal we cannot listen for is logged and never fires.
async fn shutdown_signal()
{
	let interrupt = async {
		match tokio::signal::ctrl_c().await {
			Ok(()) => tracing::info!("received SIGINT"),
			Err(err) => {
				tracing::error!(error = &err as &dyn Error, "cannot listen for SIGINT");
				future::pending::<()>().await;
			},
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};

		let mut sigterm = match signal(SignalKind::terminate()) {
			Ok(sigterm) => sigterm,
			Err(err) => {
				tracing::error!(error = &err as &dyn Error, "cannot listen for SIGTERM");
				return future::pending::<()>().await;
			},
		};

		if sigterm.recv().await.is_some() {
			tracing::info!("received SIGTERM");
		} else {
			future::pending::<()>().await;
		}
	};

	#[cfg(not(unix))]
	let terminate = future::pending::<()>();

	tokio::select! {
		() = interrupt => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}
