use std::{error::Error, fmt, sync::Arc};

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
	BuildUrlError,
	Cancelled,
	ConfigError,
	DISCOVERY_URL,
	Fetch,
	LoginResult,
	RealmConfig,
	Resource,
	ResourceCache,
	Verification,
	callback,
	discovery,
	urls,
	verification,
};

/// Steam OpenID 2.0 client.
///
/// The realm and callback URL can either be fixed when building the client, or passed to each
/// call (the `*_with` methods).
///
/// The provider endpoint is discovered lazily and cached. If discovery fails, a hard-coded
/// endpoint is used instead and discovery is retried on the next call.
#[derive(Debug)]
pub struct Client<F>
{
	fetcher: F,
	cache: ResourceCache,
	config: Option<RealmConfig>,
	discovery_url: Url,
}

/// Error returned by [`Client::verify()`].
#[derive(Debug)]
pub enum VerifyError<E>
{
	/// The verification URL could not be built.
	Build(BuildUrlError),

	/// The request was cancelled.
	Cancelled(Cancelled),

	/// Sending the request to Steam failed.
	///
	/// This says nothing about the validity of the login.
	Request(E),
}

#[bon::bon]
impl<F> Client<F>
{
	/// Creates a new [`Client`].
	///
	/// `discovery_url` defaults to [`DISCOVERY_URL`].
	#[builder]
	pub fn new(fetcher: F, config: Option<RealmConfig>, discovery_url: Option<Url>) -> Self
	{
		Self {
			fetcher,
			cache: ResourceCache::new(),
			config,
			discovery_url: discovery_url.unwrap_or_else(default_discovery_url),
		}
	}

	pub fn fetcher(&self) -> &F
	{
		&self.fetcher
	}

	/// The realm / callback URL this client was built with.
	pub fn config(&self) -> Option<&RealmConfig>
	{
		self.config.as_ref()
	}

	/// Validates a callback against the configured callback URL.
	///
	/// # Errors
	///
	/// Fails if the client was built without a [`RealmConfig`].
	pub fn parse_callback(&self, url: &Url) -> Result<LoginResult, ConfigError>
	{
		let config = self.config.as_ref().ok_or(ConfigError::MissingCallback)?;

		Ok(callback::parse_callback(config.callback_url(), url))
	}

	/// Validates a callback against `expected_callback`.
	pub fn parse_callback_with(&self, expected_callback: &str, url: &Url) -> LoginResult
	{
		callback::parse_callback(expected_callback, url)
	}

	/// Decodes the raw body of a `check_authentication` response.
	pub fn check_authentication(&self, response: &str) -> Verification
	{
		verification::parse_verification(response)
	}
}

impl<F> Client<F>
where
	F: Fetch,
{
	/// Returns the provider endpoint.
	///
	/// A cached endpoint is returned as-is unless `force_refresh` is set, in which case discovery
	/// is performed exactly once. Failed discovery yields [`Resource::FALLBACK`], which is not
	/// cached.
	#[tracing::instrument(level = "debug", skip(self, cancellation_token), err(level = "debug"))]
	pub async fn resource(
		&self,
		force_refresh: bool,
		cancellation_token: &CancellationToken,
	) -> Result<Arc<Resource>, Cancelled>
	{
		if !force_refresh {
			if let Some(resource) = self.cache.get() {
				return Ok(resource);
			}
		}

		match self.discover(cancellation_token).await? {
			Some(resource) => {
				let resource = Arc::new(resource);
				self.cache.set(Arc::clone(&resource));
				Ok(resource)
			},
			None => Ok(Arc::new(Resource::FALLBACK)),
		}
	}

	async fn discover(
		&self,
		cancellation_token: &CancellationToken,
	) -> Result<Option<Resource>, Cancelled>
	{
		let response = tokio::select! {
			biased;

			() = cancellation_token.cancelled() => return Err(Cancelled),
			response = self.fetcher.get(&self.discovery_url) => response,
		};

		let body = match response {
			Ok(body) => body,
			Err(err) => {
				tracing::warn!(
					error = &err as &dyn Error,
					url = self.discovery_url.as_str(),
					"failed to fetch XRDS document; using fallback endpoint",
				);

				return Ok(None);
			},
		};

		let resource = discovery::read_resource(&body[..], cancellation_token).await?;

		if resource.is_none() {
			tracing::warn!(
				url = self.discovery_url.as_str(),
				"failed to read XRDS document; using fallback endpoint",
			);
		}

		Ok(resource)
	}

	/// Builds the login URL for the configured realm and callback.
	///
	/// # Errors
	///
	/// Fails if the client was built without a [`RealmConfig`].
	pub async fn login_url(&self, cancellation_token: &CancellationToken) -> Result<Url, BuildUrlError>
	{
		let config = self.config.as_ref().ok_or(ConfigError::MissingRealm)?;

		self.login_url_with(config.realm(), config.callback_url(), cancellation_token)
			.await
	}

	/// Builds the login URL for the given realm and callback.
	///
	/// The realm / callback pair is validated before the endpoint is resolved.
	#[tracing::instrument(level = "debug", skip(self, cancellation_token), err(level = "debug"))]
	pub async fn login_url_with(
		&self,
		realm: &str,
		callback_url: &str,
		cancellation_token: &CancellationToken,
	) -> Result<Url, BuildUrlError>
	{
		RealmConfig::validate(realm, callback_url)?;

		let resource = self.resource(false, cancellation_token).await?;

		urls::login_url(realm, callback_url, &resource)
	}

	/// Builds the `check_authentication` URL for a callback.
	///
	/// Validate the callback with [`Client::parse_callback()`] first.
	#[tracing::instrument(
		level = "debug",
		skip_all,
		fields(callback_url = callback_url.as_str()),
		err(level = "debug"),
	)]
	pub async fn verification_url(
		&self,
		callback_url: &Url,
		cancellation_token: &CancellationToken,
	) -> Result<Url, BuildUrlError>
	{
		let resource = self.resource(false, cancellation_token).await?;

		urls::verification_url(&resource, callback_url)
	}

	/// Asks Steam to confirm the assertion in `callback_url`.
	///
	/// # Errors
	///
	/// Transport failures are reported as [`VerifyError::Request`]; they are never turned into an
	/// [`Invalid`] verdict.
	///
	/// [`Invalid`]: crate::AuthenticationVerdict::Invalid
	#[tracing::instrument(
		level = "debug",
		skip_all,
		fields(callback_url = callback_url.as_str()),
		ret(level = "debug"),
		err(level = "debug"),
	)]
	pub async fn verify(
		&self,
		callback_url: &Url,
		cancellation_token: &CancellationToken,
	) -> Result<Verification, VerifyError<F::Error>>
	{
		let url = self
			.verification_url(callback_url, cancellation_token)
			.await
			.map_err(VerifyError::Build)?;

		let response = tokio::select! {
			biased;

			() = cancellation_token.cancelled() => return Err(VerifyError::Cancelled(Cancelled)),
			response = self.fetcher.post(&url) => response.map_err(VerifyError::Request)?,
		};

		Ok(self.check_authentication(&String::from_utf8_lossy(&response)))
	}
}

fn default_discovery_url() -> Url
{
	DISCOVERY_URL
		.parse()
		.unwrap_or_else(|err| panic!("hard-coded URL should be valid: {err}"))
}

impl<E> fmt::Display for VerifyError<E>
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str("failed to verify callback: ")?;

		match self {
			Self::Build(err) => fmt::Display::fmt(err, fmt),
			Self::Cancelled(err) => fmt::Display::fmt(err, fmt),
			Self::Request(_) => fmt.write_str("failed to make HTTP request to Steam"),
		}
	}
}

impl<E> Error for VerifyError<E>
where
	E: Error + 'static,
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self {
			Self::Build(err) => Some(err),
			Self::Cancelled(err) => Some(err),
			Self::Request(err) => Some(err),
		}
	}
}
