mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Feed, Merge, Service, Tracker, Yard};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if !cfg.yard.lat.is_finite() || !(-90.0..=90.0).contains(&cfg.yard.lat) {
		return Err(Error::Validation {
			message: "yard.lat must be a finite number in the range -90.0-90.0.".to_string(),
		});
	}
	if !cfg.yard.lng.is_finite() || !(-180.0..=180.0).contains(&cfg.yard.lng) {
		return Err(Error::Validation {
			message: "yard.lng must be a finite number in the range -180.0-180.0.".to_string(),
		});
	}
	if !cfg.yard.radius_km.is_finite() {
		return Err(Error::Validation {
			message: "yard.radius_km must be a finite number.".to_string(),
		});
	}
	if cfg.yard.radius_km <= 0.0 {
		return Err(Error::Validation {
			message: "yard.radius_km must be greater than zero.".to_string(),
		});
	}

	let api_base = cfg.feed.api_base.trim();

	if api_base.is_empty() {
		return Err(Error::Validation { message: "feed.api_base must be non-empty.".to_string() });
	}
	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "feed.api_base must start with http:// or https://.".to_string(),
		});
	}

	for (label, path) in
		[("feed.gps_path", &cfg.feed.gps_path), ("feed.alert_path", &cfg.feed.alert_path)]
	{
		if !path.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
	}

	if cfg.feed.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "feed.poll_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "feed.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.feed.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("feed.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.feed.api_base.trim().trim_end_matches('/').to_string();

	cfg.feed.api_base = trimmed;

	if cfg.feed.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.feed.api_key = None;
	}
}
