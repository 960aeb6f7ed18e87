use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use yardwatch_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml() -> String {
	SAMPLE_CONFIG_TEMPLATE_TOML.to_string()
}

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut doc: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = doc.as_table_mut().expect("Template config must be a table.");
	let table = root
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{section}]."));

	table.insert(key.to_string(), value);

	toml::to_string(&doc).expect("Failed to render template config.")
}

fn sample_toml_without(section: &str) -> String {
	let mut doc: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = doc.as_table_mut().expect("Template config must be a table.");

	root.remove(section);

	toml::to_string(&doc).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("yardwatch_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> yardwatch_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = yardwatch_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(&sample_toml()).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(sample_toml()).expect("Expected sample config to load.");

	assert_eq!(cfg.feed.api_base, "http://127.0.0.1:9000/api");
	assert!(cfg.feed.api_key.is_none(), "Blank api_key must normalize to None.");
	assert_eq!(cfg.feed.poll_interval_ms, 60_000);
	assert_eq!(cfg.yard.radius_km, 0.5);
	assert!(!cfg.merge.include_live_only);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let payload = "\
[service]
http_bind = \"127.0.0.1:8080\"

[feed]
api_base = \"https://fleet.example.com/api\"
"
	.to_string();
	let cfg = load_payload(payload).expect("Expected minimal config to load.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.yard.lat, -33.870);
	assert_eq!(cfg.yard.lng, 151.200);
	assert_eq!(cfg.yard.radius_km, 0.5);
	assert_eq!(cfg.feed.gps_path, "/gps-data");
	assert_eq!(cfg.feed.alert_path, "/alert");
	assert_eq!(cfg.feed.poll_interval_ms, 60_000);
	assert_eq!(cfg.tracker.max_idle_cycles, 0);
}

#[test]
fn service_only_file_loads_with_feed_defaults() {
	let payload = "[service]\nhttp_bind = \"127.0.0.1:8080\"\n".to_string();
	let cfg = load_payload(payload).expect("Expected service-only config to load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
	assert_eq!(cfg.feed.api_base, "https://your-backend-url.com/api");
	assert_eq!(cfg.feed.gps_path, "/gps-data");
	assert_eq!(cfg.feed.timeout_ms, 10_000);
	assert!(cfg.feed.api_key.is_none());
	assert!(cfg.feed.default_headers.is_empty());
}

#[test]
fn empty_file_loads_with_defaults() {
	let cfg = load_payload(String::new()).expect("Expected empty config to load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.feed.api_base, "https://your-backend-url.com/api");
	assert_eq!(cfg.feed.alert_path, "/alert");
	assert_eq!(cfg.yard.radius_km, 0.5);
}

#[test]
fn missing_feed_section_keeps_other_sections() {
	let cfg = load_payload(sample_toml_without("feed")).expect("Expected config without [feed] to load.");

	assert_eq!(cfg.feed.api_base, "https://your-backend-url.com/api");
	assert_eq!(cfg.feed.poll_interval_ms, 60_000);
	assert_eq!(cfg.service.http_bind, base_config().service.http_bind);
}

#[test]
fn malformed_toml_is_a_parse_error() {
	let err = load_payload("[yard\nlat = 1.0\n".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn unreadable_path_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("yardwatch_config_test_missing_file.toml");

	let err = yardwatch_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn radius_must_be_positive() {
	let err = load_payload(sample_toml_with("yard", "radius_km", Value::Float(0.0)))
		.expect_err("Expected radius validation error.");

	assert!(
		err.to_string().contains("yard.radius_km must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn yard_latitude_must_be_in_range() {
	let err = load_payload(sample_toml_with("yard", "lat", Value::Float(91.5)))
		.expect_err("Expected latitude validation error.");

	assert!(err.to_string().contains("yard.lat must be a finite number"), "Unexpected error: {err}");
}

#[test]
fn yard_longitude_must_be_finite() {
	let mut cfg = base_config();

	cfg.yard.lng = f64::NAN;

	let err = yardwatch_config::validate(&cfg).expect_err("Expected longitude validation error.");

	assert!(err.to_string().contains("yard.lng must be a finite number"), "Unexpected error: {err}");
}

#[test]
fn poll_interval_must_be_positive() {
	let err = load_payload(sample_toml_with("feed", "poll_interval_ms", Value::Integer(0)))
		.expect_err("Expected poll interval validation error.");

	assert!(
		err.to_string().contains("feed.poll_interval_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn api_base_requires_http_scheme() {
	let err = load_payload(sample_toml_with(
		"feed",
		"api_base",
		Value::String("fleet.example.com".to_string()),
	))
	.expect_err("Expected api_base validation error.");

	assert!(
		err.to_string().contains("feed.api_base must start with http:// or https://."),
		"Unexpected error: {err}"
	);
}

#[test]
fn paths_must_be_absolute() {
	let mut cfg = base_config();

	cfg.feed.alert_path = "alert".to_string();

	let err = yardwatch_config::validate(&cfg).expect_err("Expected path validation error.");

	assert!(
		err.to_string().contains("feed.alert_path must start with '/'."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_header_values_must_be_strings() {
	let mut cfg = base_config();

	cfg.feed.default_headers.insert("x-retries".to_string(), serde_json::json!(3));

	let err = yardwatch_config::validate(&cfg).expect_err("Expected header validation error.");

	assert!(
		err.to_string().contains("feed.default_headers.x-retries must be a string."),
		"Unexpected error: {err}"
	);
}
