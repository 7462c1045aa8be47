//! Walks through register, an authenticated call that renews the token, and logout against a
//! mock backend, using the default reqwest transport and an in-memory token slot.

// crates.io
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use color_eyre::Result;
use httpmock::prelude::*;
use time::OffsetDateTime;
// self
use bearer_keeper::{auth::Credentials, config::SessionConfig, http::SessionClient};

fn demo_token(exp: i64) -> String {
	let header = BASE64_URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
	let claims = BASE64_URL_SAFE_NO_PAD
		.encode(serde_json::json!({ "username": "demo", "id": 1, "exp": exp }).to_string());

	format!("{header}.{claims}.c2lnbmF0dXJl")
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let now = OffsetDateTime::now_utc().unix_timestamp();
	let issued = demo_token(now + 300);
	let renewed = demo_token(now + 900);
	let server = MockServer::start_async().await;
	let register_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/register");
			then.status(201).json_body(serde_json::json!({ "token": issued, "message": "Welcome" }));
		})
		.await;
	let todos_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/todos").header("authorization", format!("Bearer {issued}"));
			then.status(200).json_body(serde_json::json!({ "todos": ["ship it"], "token": renewed }));
		})
		.await;
	let config = SessionConfig::builder(server.url("/api")).build()?;
	let client = SessionClient::in_memory(config);
	let response = client.register(&Credentials::new("demo", "demo-password")).await?;

	println!("register: {:?} (token {})", response.message, response.token.fingerprint());

	let claims = client.store().claims()?;

	println!("claims: {claims:?}");
	println!("authenticated after register: {}", client.is_authenticated());

	let todos = client.get("/todos").await?;

	println!("todos status {} body {:?}", todos.status, todos.body);

	if let Some(current) = client.store().load()? {
		println!("renewed token fingerprint: {}", current.fingerprint());
	}

	client.logout()?;

	println!("authenticated after logout: {}", client.is_authenticated());

	register_mock.assert_async().await;
	todos_mock.assert_async().await;

	Ok(())
}
