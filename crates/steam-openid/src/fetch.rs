use std::error::Error;

use bytes::Bytes;
use url::Url;

/// Outbound HTTP used by the [`Client`].
///
/// Timeouts, redirects and headers are up to the implementation. Both methods should resolve to
/// the response body, and fail on transport errors as well as unsuccessful status codes.
///
/// [`Client`]: crate::Client
pub trait Fetch
{
	type Error: Error + Send + Sync + 'static;

	/// Sends a `GET` request (used for discovery).
	fn get(&self, url: &Url) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;

	/// Sends a `POST` request (used for `check_authentication`).
	fn post(&self, url: &Url) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_impl::ReqwestFetcher;

#[cfg(feature = "reqwest")]
mod reqwest_impl
{
	use std::time::Duration;

	use bytes::Bytes;
	use url::Url;

	use super::Fetch;

	/// [`Fetch`] implementation backed by [`reqwest`].
	#[derive(Debug, Clone)]
	pub struct ReqwestFetcher
	{
		http_client: reqwest::Client,
	}

	impl ReqwestFetcher
	{
		/// Wraps an existing client.
		pub fn new(http_client: reqwest::Client) -> Self
		{
			Self { http_client }
		}

		/// Builds a client that gives up on requests after `timeout`.
		pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error>
		{
			reqwest::Client::builder().timeout(timeout).build().map(Self::new)
		}
	}

	impl Fetch for ReqwestFetcher
	{
		type Error = reqwest::Error;

		#[tracing::instrument(level = "debug", skip_all, fields(url = url.as_str()), err(level = "debug"))]
		async fn get(&self, url: &Url) -> Result<Bytes, Self::Error>
		{
			self.http_client
				.get(url.clone())
				.send()
				.await
				.and_then(reqwest::Response::error_for_status)?
				.bytes()
				.await
		}

		#[tracing::instrument(level = "debug", skip_all, fields(url = url.as_str()), err(level = "debug"))]
		async fn post(&self, url: &Url) -> Result<Bytes, Self::Error>
		{
			self.http_client
				.post(url.clone())
				.send()
				.await
				.and_then(reqwest::Response::error_for_status)?
				.bytes()
				.await
		}
	}
}
