use std::{
	error::Error,
	fmt,
	sync::{
		Mutex,
		PoisonError,
		atomic::{self, AtomicUsize},
	},
};

use bytes::Bytes;
use steam_openid::{
	AuthenticationVerdict,
	BuildUrlError,
	Cancelled,
	Client,
	ConfigError,
	Fetch,
	LoginStatus,
	RealmConfig,
	Resource,
	VerifyError,
};
use tokio_util::sync::CancellationToken;
use url::Url;

const REALM: &str = "http://localhost:8001/";
const CALLBACK: &str = "http://localhost:8001/openid/login";

const XRDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">
	<XRD>
		<Service priority="0">
			<Type>http://specs.openid.net/auth/2.0/server</Type>
			<URI>https://op.example/openid/login</URI>
		</Service>
	</XRD>
</xrds:XRDS>
"#;

const CALLBACK_QUERY: &str = "openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0&openid.mode=id_res&openid.op_endpoint=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Flogin&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198282622073&openid.identity=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198282622073&openid.return_to=http%3A%2F%2Flocalhost%3A8001%2Fopenid%2Flogin&openid.response_nonce=2024-06-15T00%3A36%3A00Z7nVIS5lDAcZe%2FT0gT4%2BQNQyexyA%3D&openid.assoc_handle=1234567890&openid.signed=signed%2Cop_endpoint%2Cclaimed_id%2Cidentity%2Creturn_to%2Cresponse_nonce%2Cassoc_handle&openid.sig=BK0zC%2F%2FKzERs7N%2BNlDO0aL06%2BBA%3D";

#[derive(Debug)]
struct FakeError;

impl fmt::Display for FakeError
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str("connection refused")
	}
}

impl Error for FakeError {}

/// Serves canned responses and counts requests.
#[derive(Debug)]
struct FakeFetcher
{
	discovery: Option<&'static str>,
	verification: Option<&'static str>,
	gets: AtomicUsize,
	posts: AtomicUsize,
	last_post: Mutex<Option<Url>>,
}

impl FakeFetcher
{
	fn new(discovery: Option<&'static str>, verification: Option<&'static str>) -> Self
	{
		Self {
			discovery,
			verification,
			gets: AtomicUsize::new(0),
			posts: AtomicUsize::new(0),
			last_post: Mutex::new(None),
		}
	}

	fn gets(&self) -> usize
	{
		self.gets.load(atomic::Ordering::SeqCst)
	}

	fn posts(&self) -> usize
	{
		self.posts.load(atomic::Ordering::SeqCst)
	}

	fn last_post(&self) -> Option<Url>
	{
		self.last_post
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}
}

impl Fetch for FakeFetcher
{
	type Error = FakeError;

	async fn get(&self, _url: &Url) -> Result<Bytes, Self::Error>
	{
		self.gets.fetch_add(1, atomic::Ordering::SeqCst);
		self.discovery
			.map(|body| Bytes::from_static(body.as_bytes()))
			.ok_or(FakeError)
	}

	async fn post(&self, url: &Url) -> Result<Bytes, Self::Error>
	{
		self.posts.fetch_add(1, atomic::Ordering::SeqCst);
		*self.last_post.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.clone());
		self.verification
			.map(|body| Bytes::from_static(body.as_bytes()))
			.ok_or(FakeError)
	}
}

fn client(fetcher: FakeFetcher) -> Client<FakeFetcher>
{
	let config = RealmConfig::new(REALM, CALLBACK).unwrap_or_else(|err| panic!("{err}"));

	Client::builder().fetcher(fetcher).config(config).build()
}

fn callback_url() -> Url
{
	format!("{CALLBACK}?{CALLBACK_QUERY}")
		.parse()
		.unwrap_or_else(|err| panic!("hard-coded URL should be valid: {err}"))
}

fn discovered() -> Resource
{
	Resource::new("http://specs.openid.net/auth/2.0/server", "https://op.example/openid/login")
}

#[tokio::test]
async fn discovery_result_is_cached()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let token = CancellationToken::new();

	let first = client.resource(false, &token).await;
	let second = client.resource(false, &token).await;

	assert_eq!(first.as_deref(), Ok(&discovered()));
	assert_eq!(second.as_deref(), Ok(&discovered()));
	assert_eq!(client_gets(&client), 1);
}

#[tokio::test]
async fn force_refresh_discovers_exactly_once()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let token = CancellationToken::new();

	assert!(client.resource(false, &token).await.is_ok());
	assert_eq!(client_gets(&client), 1);

	assert!(client.resource(true, &token).await.is_ok());
	assert_eq!(client_gets(&client), 2);

	assert!(client.resource(false, &token).await.is_ok());
	assert_eq!(client_gets(&client), 2);
}

#[tokio::test]
async fn failed_discovery_falls_back_without_caching()
{
	for discovery in [None, Some("<xrds:XRDS><XRD><Service>"), Some("not xml at all")] {
		let client = client(FakeFetcher::new(discovery, None));
		let token = CancellationToken::new();

		assert_eq!(client.resource(false, &token).await.as_deref(), Ok(&Resource::FALLBACK));
		assert_eq!(client.resource(false, &token).await.as_deref(), Ok(&Resource::FALLBACK));
		assert_eq!(client_gets(&client), 2, "{discovery:?}");
	}
}

#[tokio::test]
async fn cancellation_is_not_a_fallback()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let token = CancellationToken::new();

	token.cancel();

	assert_eq!(client.resource(false, &token).await, Err(Cancelled));
	assert!(matches!(client.login_url(&token).await, Err(BuildUrlError::Cancelled(Cancelled))));

	let token = CancellationToken::new();

	assert_eq!(client.resource(false, &token).await.as_deref(), Ok(&discovered()));
}

#[tokio::test]
async fn login_url_uses_configured_realm()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let url = client
		.login_url(&CancellationToken::new())
		.await
		.unwrap_or_else(|err| panic!("{err}"));

	assert_eq!(
		url.as_str(),
		"https://op.example/openid/login\
		 ?openid.ns=http://specs.openid.net/auth/2.0\
		 &openid.claimed_id=http://specs.openid.net/auth/2.0/identifier_select\
		 &openid.identity=http://specs.openid.net/auth/2.0/identifier_select\
		 &openid.mode=checkid_setup\
		 &openid.realm=http://localhost:8001/\
		 &openid.return_to=http://localhost:8001/openid/login",
	);
}

#[tokio::test]
async fn login_url_requires_configuration()
{
	let client = Client::builder().fetcher(FakeFetcher::new(Some(XRDS), None)).build();
	let token = CancellationToken::new();

	assert!(matches!(
		client.login_url(&token).await,
		Err(BuildUrlError::Config(ConfigError::MissingRealm)),
	));

	assert!(matches!(
		client.parse_callback(&callback_url()),
		Err(ConfigError::MissingCallback),
	));

	let url = client
		.login_url_with("https://rp.example/", "https://rp.example/cb", &token)
		.await
		.unwrap_or_else(|err| panic!("{err}"));

	assert!(url.as_str().contains("&openid.realm=https://rp.example/&openid.return_to=https://rp.example/cb"));
}

#[tokio::test]
async fn invalid_realm_is_rejected_before_discovery()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let result = client
		.login_url_with("https://rp.example/", "https://other.example/cb", &CancellationToken::new())
		.await;

	assert!(matches!(result, Err(BuildUrlError::Config(ConfigError::CallbackOutsideRealm))));
	assert_eq!(client_gets(&client), 0);
}

#[test]
fn parse_callback_uses_configured_callback()
{
	let client = client(FakeFetcher::new(None, None));
	let result = client
		.parse_callback(&callback_url())
		.unwrap_or_else(|err| panic!("{err}"));

	assert_eq!(result.status(), LoginStatus::Success);
	assert_eq!(result.steam64(), 76561198282622073_u64);

	let result = client.parse_callback_with("http://localhost:8001/other", &callback_url());

	assert_eq!(result.status(), LoginStatus::InvalidResponse);
}

#[tokio::test]
async fn verify_posts_check_authentication()
{
	let fetcher = FakeFetcher::new(Some(XRDS), Some("ns:http://specs.openid.net/auth/2.0\nis_valid:true\n"));
	let client = client(fetcher);
	let verification = client
		.verify(&callback_url(), &CancellationToken::new())
		.await
		.unwrap_or_else(|err| panic!("{err}"));

	assert_eq!(verification.verdict, AuthenticationVerdict::Valid);

	let posted = client_last_post(&client).unwrap_or_else(|| panic!("nothing was posted"));

	assert_eq!(posted.host_str(), Some("op.example"));
	assert!(posted.query_pairs().any(|(key, value)| key == "openid.mode" && value == "check_authentication"));
}

#[tokio::test]
async fn verify_reports_reject()
{
	let fetcher = FakeFetcher::new(Some(XRDS), Some("is_valid:true\ninvalidate_handle:1234567890\n"));
	let client = client(fetcher);
	let verification = client
		.verify(&callback_url(), &CancellationToken::new())
		.await
		.unwrap_or_else(|err| panic!("{err}"));

	assert_eq!(verification.verdict, AuthenticationVerdict::Reject);
	assert_eq!(verification.invalidate_handle.as_deref(), Some("1234567890"));
}

#[tokio::test]
async fn verify_surfaces_transport_errors()
{
	let client = client(FakeFetcher::new(Some(XRDS), None));
	let result = client.verify(&callback_url(), &CancellationToken::new()).await;

	assert!(matches!(result, Err(VerifyError::Request(FakeError))));
}

#[tokio::test]
async fn cancelled_verify_sends_nothing()
{
	let client = client(FakeFetcher::new(Some(XRDS), Some("is_valid:true\n")));
	let token = CancellationToken::new();

	token.cancel();

	let result = client.verify(&callback_url(), &token).await;

	assert!(matches!(result, Err(VerifyError::Build(BuildUrlError::Cancelled(Cancelled)))));
	assert_eq!(client_gets(&client), 0);
	assert_eq!(client.fetcher().posts(), 0);
}

#[test]
fn check_authentication_decodes_text()
{
	let client = client(FakeFetcher::new(None, None));

	assert_eq!(client.check_authentication("is_valid:false\n").verdict, AuthenticationVerdict::Invalid);
	assert_eq!(client.check_authentication("").verdict, AuthenticationVerdict::InvalidResponse);
}

fn client_gets(client: &Client<FakeFetcher>) -> usize
{
	client.fetcher().gets()
}

fn client_last_post(client: &Client<FakeFetcher>) -> Option<Url>
{
	client.fetcher().last_post()
}
