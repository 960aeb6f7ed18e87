use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	time::Duration,
};

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{self as tokio_time, MissedTickBehavior},
};

use yardwatch_domain::decode_report;

use crate::{AlertDispatcher, CycleOutcome, FleetEngine, Providers};

/// Cancellation flag shared by the poller loop and its in-flight fetches.
#[derive(Clone, Debug)]
pub struct CancelToken {
	tx: Arc<watch::Sender<bool>>,
}
impl CancelToken {
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(false);

		Self { tx: Arc::new(tx) }
	}

	pub fn cancel(&self) {
		self.tx.send_replace(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.tx.borrow()
	}

	pub async fn cancelled(&self) {
		let mut rx = self.tx.subscribe();

		// The sender lives in `self`, so this only returns once the flag flips.
		let _ = rx.wait_for(|cancelled| *cancelled).await;
	}
}
impl Default for CancelToken {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug, Default)]
pub struct PollerStats {
	running: AtomicBool,
	cycles_started: AtomicU64,
	cycles_applied: AtomicU64,
	cycles_failed: AtomicU64,
	cycles_discarded: AtomicU64,
	skipped_ticks: AtomicU64,
	alerts_dispatched: AtomicU64,
	last_success_at: Mutex<Option<OffsetDateTime>>,
}
impl PollerStats {
	pub fn status(&self) -> PollerStatus {
		let last_success_at = *self.last_success_at.lock().unwrap_or_else(|err| err.into_inner());

		PollerStatus {
			running: self.running.load(Ordering::Relaxed),
			cycles_started: self.cycles_started.load(Ordering::Relaxed),
			cycles_applied: self.cycles_applied.load(Ordering::Relaxed),
			cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
			cycles_discarded: self.cycles_discarded.load(Ordering::Relaxed),
			skipped_ticks: self.skipped_ticks.load(Ordering::Relaxed),
			alerts_dispatched: self.alerts_dispatched.load(Ordering::Relaxed),
			last_success_at: last_success_at.and_then(|ts| ts.format(&Rfc3339).ok()),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PollerStatus {
	pub running: bool,
	pub cycles_started: u64,
	pub cycles_applied: u64,
	pub cycles_failed: u64,
	pub cycles_discarded: u64,
	pub skipped_ticks: u64,
	pub alerts_dispatched: u64,
	pub last_success_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleResult {
	Applied(CycleOutcome),
	Failed,
	/// The fetch finished after the poller was stopped.
	Discarded,
}

/// Periodically pulls the live feed into a [`FleetEngine`].
#[derive(Clone)]
pub struct LiveFeedPoller {
	engine: Arc<FleetEngine>,
	providers: Providers,
	dispatcher: AlertDispatcher,
	stats: Arc<PollerStats>,
	interval: Duration,
}
impl LiveFeedPoller {
	pub fn new(engine: Arc<FleetEngine>, providers: Providers, interval: Duration) -> Self {
		let dispatcher = AlertDispatcher::new(providers.alerts.clone());

		Self { engine, providers, dispatcher, stats: Arc::new(PollerStats::default()), interval }
	}

	pub fn stats(&self) -> Arc<PollerStats> {
		self.stats.clone()
	}

	/// Spawns the timer loop. The first fetch starts immediately.
	pub fn start(self) -> PollerHandle {
		let token = CancelToken::new();
		let engine = self.engine.clone();
		let stats = self.stats.clone();

		stats.running.store(true, Ordering::Relaxed);
		tracing::info!(interval_ms = self.interval.as_millis() as u64, "Live feed poller started.");

		let task = tokio::spawn(self.run(token.clone()));

		PollerHandle { token, task, engine, stats }
	}

	/// Runs one fetch and applies it unless `token` was cancelled by the time it resolves.
	pub async fn poll_once(&self, token: &CancelToken) -> CycleResult {
		self.stats.cycles_started.fetch_add(1, Ordering::Relaxed);

		let items = match self.providers.source.fetch().await {
			Ok(items) => items,
			Err(err) => {
				self.stats.cycles_failed.fetch_add(1, Ordering::Relaxed);
				tracing::error!(error = %err, "Live feed fetch failed.");

				return CycleResult::Failed;
			},
		};
		let positions = decode_report(self.engine.yard(), &items);
		let outcome = self.engine.apply_cycle(token, positions, |trailer_id| {
			tracing::info!(trailer_id, "Trailer arrived in yard.");
			self.dispatcher.dispatch(trailer_id.to_string());
		});
		let Some(outcome) = outcome else {
			self.stats.cycles_discarded.fetch_add(1, Ordering::Relaxed);
			tracing::info!("Discarding live feed result that resolved after stop.");

			return CycleResult::Discarded;
		};

		self.stats.cycles_applied.fetch_add(1, Ordering::Relaxed);
		self.stats.alerts_dispatched.fetch_add(outcome.arrivals.len() as u64, Ordering::Relaxed);
		*self.stats.last_success_at.lock().unwrap_or_else(|err| err.into_inner()) =
			Some(OffsetDateTime::now_utc());

		if outcome.evicted > 0 {
			tracing::debug!(cycle = outcome.cycle, evicted = outcome.evicted, "Evicted idle trailers.");
		}

		tracing::debug!(
			cycle = outcome.cycle,
			positions = outcome.positions,
			arrivals = outcome.arrivals.len(),
			"Live feed cycle applied."
		);

		CycleResult::Applied(outcome)
	}

	async fn run(self, token: CancelToken) {
		let mut ticker = tokio_time::interval(self.interval);
		let mut in_flight: Option<JoinHandle<CycleResult>> = None;

		ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

		loop {
			tokio::select! {
				biased;
				_ = token.cancelled() => break,
				_ = ticker.tick() => {},
			}

			if in_flight.as_ref().is_some_and(|task| !task.is_finished()) {
				self.stats.skipped_ticks.fetch_add(1, Ordering::Relaxed);
				tracing::debug!("Previous live feed fetch still in flight. Skipping tick.");

				continue;
			}

			let poller = self.clone();
			let cycle_token = token.clone();

			in_flight = Some(tokio::spawn(async move { poller.poll_once(&cycle_token).await }));
		}
	}
}

/// Running poller. Dropping it leaves the loop running; call [`PollerHandle::stop`].
pub struct PollerHandle {
	token: CancelToken,
	task: JoinHandle<()>,
	engine: Arc<FleetEngine>,
	stats: Arc<PollerStats>,
}
impl PollerHandle {
	pub fn stats(&self) -> Arc<PollerStats> {
		self.stats.clone()
	}

	/// Stops the timer. A fetch still in flight may finish, but its result is discarded.
	pub async fn stop(self) {
		self.token.cancel();

		if let Err(err) = self.task.await {
			tracing::error!(error = %err, "Live feed poller task ended abnormally.");
		}

		self.engine.fence();
		self.stats.running.store(false, Ordering::Relaxed);
		tracing::info!("Live feed poller stopped.");
	}
}
