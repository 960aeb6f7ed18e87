pub mod alert;
pub mod feed;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// HTTP client for the fleet backend: the live GPS feed and the alert endpoint.
#[derive(Clone, Debug)]
pub struct FeedClient {
	client: Client,
	gps_url: String,
	alert_url: String,
}
impl FeedClient {
	pub fn new(cfg: &yardwatch_config::Feed) -> Result<Self> {
		let headers = request_headers(cfg.api_key.as_deref(), &cfg.default_headers)?;
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self {
			client,
			gps_url: format!("{}{}", cfg.api_base, cfg.gps_path),
			alert_url: format!("{}{}", cfg.api_base, cfg.alert_path),
		})
	}

	pub fn gps_url(&self) -> &str {
		&self.gps_url
	}

	pub fn alert_url(&self) -> &str {
		&self.alert_url
	}
}

pub fn request_headers(
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
