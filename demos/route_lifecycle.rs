//! Demonstrates the credential healing and typed route operations against a mock fleet API:
//! the first call goes out without a credential, receives 401, and is retried after login.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use fleet_probe::{
	client::{CreatedResource, FleetClient, ItemsPage, ResourceEntry},
	config::Config,
	http::ReqwestTransport,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login").header("x-tcloud-service", "fm");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"msg":{"v3":{"access_token":"demo-access"}}}"#);
		})
		.await;
	let rejected_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/vehicle/route").header_missing("authorization");
			then.status(401);
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/vehicle/route")
				.header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"msg":{"id":"route-1"}}"#);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/vehicle/route/list")
				.query_param("org_name", "lileesystems")
				.query_param("search_id", "route-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"msg":{"items":[{"id":"route-1","name":"script test demo"}]}}"#);
		})
		.await;
	let config = Config::new(
		Url::parse(&server.url("/auth/login"))?,
		Url::parse(&server.url("/vehicle/"))?,
		serde_json::json!({ "username": "demo", "password": "demo" }),
	);
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
		config.request_timeout,
	);
	let client = <FleetClient<ReqwestTransport>>::new(config, transport);
	let created = client.create_route("script test demo").await?.msg::<CreatedResource>()?;
	let listed = client.list_routes(Some(&created.id)).await?.msg::<ItemsPage<ResourceEntry>>()?;

	println!("Created route {} and listed {} matching entries.", created.id, listed.items.len());

	login_mock.assert_calls_async(1).await;
	rejected_mock.assert_calls_async(1).await;
	create_mock.assert_calls_async(1).await;
	list_mock.assert_calls_async(1).await;

	Ok(())
}
