//! The HTTP routes that drive a Steam login.
//!
//! `GET /` redirects to Steam, and Steam redirects back to the configured callback path.

mod trace;

use std::{error::Error, sync::Arc};

use axum::{
	Router,
	extract::State,
	http::{StatusCode, Uri, header},
	response::{IntoResponse, Redirect, Response},
	routing,
};
use steam_openid::{Client, Fetch, LoginResult, LoginStatus};
use url::Url;

use crate::task_manager::TaskManager;

#[derive(Debug)]
struct AppState<F>
{
	client: Arc<Client<F>>,
	callback_url: Arc<Url>,
	tasks: TaskManager,
}

impl<F> Clone for AppState<F>
{
	fn clone(&self) -> Self
	{
		Self {
			client: Arc::clone(&self.client),
			callback_url: Arc::clone(&self.callback_url),
			tasks: self.tasks.clone(),
		}
	}
}

/// Builds the router.
///
/// `callback_url` has to be the callback URL `client` was configured with; its path is where
/// Steam will send users back to.
pub(crate) fn router<F>(client: Arc<Client<F>>, callback_url: Url, tasks: TaskManager) -> Router
where
	F: Fetch + Send + Sync + 'static,
{
	let callback_path = String::from(callback_url.path());
	let state = AppState { client, callback_url: Arc::new(callback_url), tasks };

	Router::new()
		.route("/", routing::get(login::<F>))
		.route(&callback_path, routing::get(callback::<F>))
		.layer(trace::layer())
		.with_state(state)
}

/// Redirects the user to Steam.
async fn login<F>(State(state): State<AppState<F>>) -> Response
where
	F: Fetch + Send + Sync + 'static,
{
	match state.client.login_url(&state.tasks.cancellation_token()).await {
		Ok(url) => Redirect::to(url.as_str()).into_response(),
		Err(err) => {
			tracing::error!(error = &err as &dyn Error, "failed to build login url");
			StatusCode::INTERNAL_SERVER_ERROR.into_response()
		},
	}
}

/// Validates the callback and reports the outcome as plain text.
///
/// Successful logins are confirmed with Steam in the background; the verdict only shows up in
/// the logs.
async fn callback<F>(State(state): State<AppState<F>>, uri: Uri) -> Response
where
	F: Fetch + Send + Sync + 'static,
{
	let mut callback_url = Url::clone(&state.callback_url);
	callback_url.set_query(uri.query());

	let result = match state.client.parse_callback(&callback_url) {
		Ok(result) => result,
		Err(err) => {
			tracing::error!(error = &err as &dyn Error, "cannot validate callback");
			return StatusCode::INTERNAL_SERVER_ERROR.into_response();
		},
	};

	match result.error() {
		None => tracing::info!(steam64 = result.steam64(), "user logged in"),
		Some(error) => tracing::info!(status = %result.status(), error, "login failed"),
	}

	if result.is_success() {
		spawn_verification(&state, &result, callback_url);
	}

	(
		status_code(result.status()),
		[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
		format!("Status: {} - {}", result.status(), result.steam64()),
	)
		.into_response()
}

fn spawn_verification<F>(state: &AppState<F>, result: &LoginResult, callback_url: Url)
where
	F: Fetch + Send + Sync + 'static,
{
	let client = Arc::clone(&state.client);
	let span = tracing::info_span!("verify_login", steam64 = result.steam64());

	state.tasks.spawn(span, |cancellation_token| async move {
		match client.verify(&callback_url, &cancellation_token).await {
			Ok(verification) => tracing::info!(
				verdict = %verification.verdict,
				invalidate_handle = verification.invalidate_handle.as_deref(),
				"verified login with Steam",
			),
			Err(err) => {
				tracing::warn!(error = &err as &dyn Error, "failed to verify login with Steam");
			},
		}
	});
}

fn status_code(status: LoginStatus) -> StatusCode
{
	match status {
		LoginStatus::Success => StatusCode::OK,
		LoginStatus::Cancelled => StatusCode::BAD_REQUEST,
		LoginStatus::Error | LoginStatus::InvalidResponse => StatusCode::INTERNAL_SERVER_ERROR,
	}
}
