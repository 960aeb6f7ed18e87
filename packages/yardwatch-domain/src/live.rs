use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{
	geofence::Yard,
	ingest::{parse_float, truthy_text},
	model::{LivePosition, Location},
};

/// Feed coordinates are fixed-point degrees scaled by this factor.
pub const COORDINATE_SCALE: f64 = 100_000.0;

/// One entry of the feed's `report` array, kept raw until decoded.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeedItem {
	#[serde(default)]
	pub vehicleexternalid: Option<Value>,
	#[serde(default)]
	pub objectlatitude: Option<Value>,
	#[serde(default)]
	pub objectlongitude: Option<Value>,
}

pub fn decode_report(yard: &Yard, items: &[FeedItem]) -> Vec<LivePosition> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| {
			let location = Location {
				lat: scaled(item.objectlatitude.as_ref()),
				lng: scaled(item.objectlongitude.as_ref()),
			};
			let id = item
				.vehicleexternalid
				.as_ref()
				.and_then(truthy_text)
				.unwrap_or_else(|| format!("GPS-{index}"));

			LivePosition::new(yard, id, location)
		})
		.collect()
}

/// Positions of one applied poll cycle, indexed by id.
///
/// When a report repeats an id the first occurrence is indexed; the rest stay in `positions`.
#[derive(Clone, Debug, Default)]
pub struct LiveSnapshot {
	cycle: u64,
	positions: Vec<LivePosition>,
	index: HashMap<String, usize>,
}
impl LiveSnapshot {
	pub fn new(cycle: u64, positions: Vec<LivePosition>) -> Self {
		let mut index = HashMap::with_capacity(positions.len());

		for (idx, position) in positions.iter().enumerate() {
			index.entry(position.id().to_string()).or_insert(idx);
		}

		Self { cycle, positions, index }
	}

	pub fn cycle(&self) -> u64 {
		self.cycle
	}

	pub fn get(&self, id: &str) -> Option<&LivePosition> {
		self.index.get(id).map(|idx| &self.positions[*idx])
	}

	/// Indexed positions in feed order.
	pub fn iter(&self) -> impl Iterator<Item = &LivePosition> {
		self.positions
			.iter()
			.enumerate()
			.filter(|(idx, position)| self.index.get(position.id()) == Some(idx))
			.map(|(_, position)| position)
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}
}

fn scaled(raw: Option<&Value>) -> f64 {
	raw.map(parse_float).unwrap_or(f64::NAN) / COORDINATE_SCALE
}
