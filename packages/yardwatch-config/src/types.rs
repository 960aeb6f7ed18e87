use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub yard: Yard,
	pub feed: Feed,
	pub merge: Merge,
	pub tracker: Tracker,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: "127.0.0.1:8080".to_string(), log_level: "info".to_string() }
	}
}

/// Center and radius of the home geofence.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Yard {
	pub lat: f64,
	pub lng: f64,
	pub radius_km: f64,
}
impl Default for Yard {
	fn default() -> Self {
		Self { lat: -33.870, lng: 151.200, radius_km: 0.5 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Feed {
	pub api_base: String,
	pub gps_path: String,
	pub alert_path: String,
	pub poll_interval_ms: u64,
	pub timeout_ms: u64,
	/// Optional. Sent as a bearer token on feed and alert requests.
	pub api_key: Option<String>,
	pub default_headers: Map<String, Value>,
}
impl Default for Feed {
	fn default() -> Self {
		Self {
			api_base: "https://your-backend-url.com/api".to_string(),
			gps_path: "/gps-data".to_string(),
			alert_path: "/alert".to_string(),
			poll_interval_ms: 60_000,
			timeout_ms: 10_000,
			api_key: None,
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Merge {
	/// Append live positions that have no uploaded record to the merged view.
	pub include_live_only: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Tracker {
	/// Evict ids not seen for this many poll cycles. Zero keeps every id forever.
	pub max_idle_cycles: u64,
}
