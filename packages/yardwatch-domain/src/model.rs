use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geofence::Yard;

pub const UNKNOWN_SERVICE: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
	pub lat: f64,
	pub lng: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
	InYard,
	OutForJob,
}
impl ZoneStatus {
	pub fn label(self) -> &'static str {
		match self {
			Self::InYard => "In Yard",
			Self::OutForJob => "Out for Job",
		}
	}
}
impl fmt::Display for ZoneStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// An uploaded trailer. `status` is only ever derived from `location`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerRecord {
	id: String,
	last_service: String,
	location: Location,
	status: ZoneStatus,
}
impl TrailerRecord {
	pub fn new(
		yard: &Yard,
		id: impl Into<String>,
		last_service: impl Into<String>,
		location: Location,
	) -> Self {
		Self {
			id: id.into(),
			last_service: last_service.into(),
			location,
			status: yard.classify(&location),
		}
	}

	/// A record for a live-only trailer that was never uploaded.
	pub fn from_live(live: &LivePosition) -> Self {
		Self {
			id: live.id.clone(),
			last_service: UNKNOWN_SERVICE.to_string(),
			location: live.location,
			status: live.status,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn last_service(&self) -> &str {
		&self.last_service
	}

	pub fn location(&self) -> Location {
		self.location
	}

	pub fn status(&self) -> ZoneStatus {
		self.status
	}

	pub fn relocate(&mut self, yard: &Yard, location: Location) {
		self.location = location;
		self.status = yard.classify(&location);
	}

	/// Copy of this record with the live location and status laid over it.
	pub fn overlaid(&self, live: &LivePosition) -> Self {
		Self {
			id: self.id.clone(),
			last_service: self.last_service.clone(),
			location: live.location,
			status: live.status,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LivePosition {
	id: String,
	location: Location,
	status: ZoneStatus,
}
impl LivePosition {
	pub fn new(yard: &Yard, id: impl Into<String>, location: Location) -> Self {
		Self { id: id.into(), location, status: yard.classify(&location) }
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn location(&self) -> Location {
		self.location
	}

	pub fn status(&self) -> ZoneStatus {
		self.status
	}
}
