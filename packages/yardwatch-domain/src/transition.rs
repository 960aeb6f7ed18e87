use std::collections::HashMap;

use crate::model::{LivePosition, ZoneStatus};

#[derive(Clone, Copy, Debug)]
struct Observation {
	status: ZoneStatus,
	last_seen_cycle: u64,
}

/// Last observed zone status per trailer id, used to detect yard arrivals.
#[derive(Debug, Default)]
pub struct TransitionTracker {
	observations: HashMap<String, Observation>,
	max_idle_cycles: u64,
}
impl TransitionTracker {
	/// `max_idle_cycles` of zero keeps every id forever.
	pub fn new(max_idle_cycles: u64) -> Self {
		Self { observations: HashMap::new(), max_idle_cycles }
	}

	/// Records `current` for `id` and reports whether this observation is an arrival, i.e. the
	/// previous status was out for a job and the new one is in the yard.
	pub fn observe(&mut self, id: &str, current: ZoneStatus, cycle: u64) -> bool {
		let observation = Observation { status: current, last_seen_cycle: cycle };
		let previous = match self.observations.get_mut(id) {
			Some(slot) => Some(std::mem::replace(slot, observation).status),
			None => {
				self.observations.insert(id.to_string(), observation);

				None
			},
		};

		previous == Some(ZoneStatus::OutForJob) && current == ZoneStatus::InYard
	}

	/// Observes every position in feed order and returns the ids that arrived, one entry per
	/// arrival.
	pub fn observe_cycle(&mut self, cycle: u64, positions: &[LivePosition]) -> Vec<String> {
		let mut arrivals = Vec::new();

		for position in positions {
			if self.observe(position.id(), position.status(), cycle) {
				arrivals.push(position.id().to_string());
			}
		}

		arrivals
	}

	/// Drops ids not seen within the idle window ending at `cycle`. Returns how many were dropped.
	pub fn evict_idle(&mut self, cycle: u64) -> usize {
		if self.max_idle_cycles == 0 {
			return 0;
		}

		let before = self.observations.len();
		let max_idle = self.max_idle_cycles;

		self.observations
			.retain(|_, observation| cycle.saturating_sub(observation.last_seen_cycle) < max_idle);

		before - self.observations.len()
	}

	pub fn status_of(&self, id: &str) -> Option<ZoneStatus> {
		self.observations.get(id).map(|observation| observation.status)
	}

	pub fn len(&self) -> usize {
		self.observations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.observations.is_empty()
	}
}
