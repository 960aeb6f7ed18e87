use std::sync::{Arc, Mutex};

use yardwatch_config::Config;
use yardwatch_domain::{
	BatchRow, LivePosition, LiveSnapshot, MergeOptions, TrailerRecord, TransitionTracker, Yard,
	ZoneStatus, ingest_rows, merge,
};

use crate::{poller::CancelToken, store::RecordStore};

/// What one applied poll cycle changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleOutcome {
	pub cycle: u64,
	pub positions: usize,
	pub arrivals: Vec<String>,
	pub evicted: usize,
}

#[derive(Debug, Default)]
struct LiveState {
	tracker: TransitionTracker,
	snapshot: Arc<LiveSnapshot>,
	applied_cycles: u64,
}

/// Shared state of the yard monitor: uploaded records, the live snapshot and the arrival tracker.
///
/// Only the poller writes the live side, one cycle per critical section. Readers take a
/// snapshot under the same lock and merge outside it.
#[derive(Debug)]
pub struct FleetEngine {
	yard: Yard,
	merge_options: MergeOptions,
	records: RecordStore,
	live: Mutex<LiveState>,
}
impl FleetEngine {
	pub fn new(yard: Yard, merge_options: MergeOptions, max_idle_cycles: u64) -> Self {
		Self {
			yard,
			merge_options,
			records: RecordStore::default(),
			live: Mutex::new(LiveState {
				tracker: TransitionTracker::new(max_idle_cycles),
				..Default::default()
			}),
		}
	}

	pub fn from_config(cfg: &Config) -> Self {
		Self::new(Yard::from(&cfg.yard), MergeOptions::from(&cfg.merge), cfg.tracker.max_idle_cycles)
	}

	pub fn yard(&self) -> &Yard {
		&self.yard
	}

	/// Replaces the uploaded batch and returns the ingested records.
	pub fn upload(&self, rows: &[BatchRow]) -> Arc<Vec<TrailerRecord>> {
		let records = ingest_rows(&self.yard, rows);
		let in_yard =
			records.iter().filter(|record| record.status() == ZoneStatus::InYard).count();

		tracing::info!(rows = records.len(), in_yard, "Trailer batch uploaded.");

		self.records.replace(records)
	}

	pub fn records(&self) -> Arc<Vec<TrailerRecord>> {
		self.records.snapshot()
	}

	pub fn live_snapshot(&self) -> Arc<LiveSnapshot> {
		self.lock_live().snapshot.clone()
	}

	pub fn merged_view(&self) -> Vec<TrailerRecord> {
		let records = self.records.snapshot();
		let live = self.live_snapshot();

		merge(&records, &live, self.merge_options)
	}

	pub fn tracked_status(&self, trailer_id: &str) -> Option<ZoneStatus> {
		self.lock_live().tracker.status_of(trailer_id)
	}

	pub fn tracked_ids(&self) -> usize {
		self.lock_live().tracker.len()
	}

	/// Applies one cycle of decoded positions unless `token` is cancelled.
	///
	/// Tracker update, snapshot swap and `on_arrival` calls happen under one lock, so a cancelled
	/// token observed by [`FleetEngine::fence`] guarantees no later effects.
	pub fn apply_cycle<F>(
		&self,
		token: &CancelToken,
		positions: Vec<LivePosition>,
		mut on_arrival: F,
	) -> Option<CycleOutcome>
	where
		F: FnMut(&str),
	{
		let mut state = self.lock_live();

		if token.is_cancelled() {
			return None;
		}

		state.applied_cycles += 1;

		let cycle = state.applied_cycles;
		let arrivals = state.tracker.observe_cycle(cycle, &positions);
		let evicted = state.tracker.evict_idle(cycle);
		let count = positions.len();

		state.snapshot = Arc::new(LiveSnapshot::new(cycle, positions));

		for trailer_id in &arrivals {
			on_arrival(trailer_id);
		}

		Some(CycleOutcome { cycle, positions: count, arrivals, evicted })
	}

	/// Waits out any cycle currently being applied.
	pub fn fence(&self) {
		drop(self.lock_live());
	}

	fn lock_live(&self) -> std::sync::MutexGuard<'_, LiveState> {
		self.live.lock().unwrap_or_else(|err| err.into_inner())
	}
}
