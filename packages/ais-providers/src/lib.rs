pub mod local;
pub mod scorer;
pub mod tag_match;
pub mod trainer;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client, Response,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde::Serialize;
use serde_json::{Map, Value};

use ais_config::ProviderConfig;

pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Clamps a wire score into [0, 1]. Non-finite values collapse to zero.
pub fn clamp_unit(value: f64) -> f32 {
	if !value.is_finite() {
		return 0.0;
	}

	value.clamp(0.0, 1.0) as f32
}

pub(crate) async fn post_json<B>(cfg: &ProviderConfig, body: &B) -> Result<Value>
where
	B: Serialize + ?Sized,
{
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let res = client
		.post(cfg.url())
		.headers(auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(body)
		.send()
		.await?;

	read_json(res).await
}

async fn read_json(res: Response) -> Result<Value> {
	let status = res.status();

	if status.is_success() {
		return Ok(res.json().await?);
	}

	let body = res.text().await.unwrap_or_default();
	let message = serde_json::from_str::<Value>(&body)
		.ok()
		.and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string))
		.unwrap_or(body);

	Err(Error::Status { status: status.as_u16(), message })
}
