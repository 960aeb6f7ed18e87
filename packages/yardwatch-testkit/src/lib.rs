use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Map, Value};
use tokio::sync::{Notify, mpsc};

use yardwatch_config::{Config, Feed, Merge, Service, Tracker, Yard};
use yardwatch_domain::{COORDINATE_SCALE, FeedItem, Location};
use yardwatch_service::{AlertSink, BoxFuture, Error, PositionSource, Result};

pub const YARD_CENTER: Location = Location { lat: -33.870, lng: 151.200 };

/// Roughly ten kilometers due north of [`YARD_CENTER`].
pub const TEN_KM_OUT: Location = Location { lat: -33.870 + 10.0 / 111.195, lng: 151.200 };

pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		yard: Yard { lat: YARD_CENTER.lat, lng: YARD_CENTER.lng, radius_km: 0.5 },
		feed: Feed {
			api_base: "http://127.0.0.1:1".to_string(),
			gps_path: "/gps-data".to_string(),
			alert_path: "/alert".to_string(),
			poll_interval_ms: 60_000,
			timeout_ms: 1_000,
			api_key: None,
			default_headers: Map::new(),
		},
		merge: Merge::default(),
		tracker: Tracker::default(),
	}
}

/// A feed entry at `location`, encoded the way the fleet backend sends it.
pub fn feed_item(id: &str, location: Location) -> FeedItem {
	FeedItem {
		vehicleexternalid: Some(Value::String(id.to_string())),
		objectlatitude: Some(Value::from((location.lat * COORDINATE_SCALE).round() as i64)),
		objectlongitude: Some(Value::from((location.lng * COORDINATE_SCALE).round() as i64)),
	}
}

pub enum Step {
	Report(Vec<FeedItem>),
	Fail(String),
	/// Waits for the gate before answering.
	Hold(Arc<Notify>, Vec<FeedItem>),
}

/// Position source that answers from a script, then with empty reports.
#[derive(Default)]
pub struct ScriptedSource {
	script: Mutex<VecDeque<Step>>,
	calls: AtomicUsize,
}
impl ScriptedSource {
	pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
		Self { script: Mutex::new(steps.into_iter().collect()), calls: AtomicUsize::new(0) }
	}

	pub fn push(&self, step: Step) {
		self.script.lock().unwrap_or_else(|err| err.into_inner()).push_back(step);
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl PositionSource for ScriptedSource {
	fn fetch(&self) -> BoxFuture<'_, Result<Vec<FeedItem>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let step = self.script.lock().unwrap_or_else(|err| err.into_inner()).pop_front();

		Box::pin(async move {
			match step {
				None => Ok(Vec::new()),
				Some(Step::Report(items)) => Ok(items),
				Some(Step::Fail(message)) => Err(Error::Provider { message }),
				Some(Step::Hold(gate, items)) => {
					gate.notified().await;

					Ok(items)
				},
			}
		})
	}
}

/// Alert sink that forwards every attempted alert to a channel.
pub struct RecordingSink {
	tx: mpsc::UnboundedSender<String>,
	fail: bool,
}
impl RecordingSink {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
		let (tx, rx) = mpsc::unbounded_channel();

		(Self { tx, fail: false }, rx)
	}

	/// Records the attempt, then reports a delivery failure.
	pub fn failing() -> (Self, mpsc::UnboundedReceiver<String>) {
		let (tx, rx) = mpsc::unbounded_channel();

		(Self { tx, fail: true }, rx)
	}
}

impl AlertSink for RecordingSink {
	fn alert<'a>(&'a self, trailer_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let _ = self.tx.send(trailer_id.to_string());

			if self.fail {
				return Err(Error::Provider { message: "alert endpoint unavailable".to_string() });
			}

			Ok(())
		})
	}
}

/// Drains whatever alerts have been recorded so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
	let mut out = Vec::new();

	while let Ok(trailer_id) = rx.try_recv() {
		out.push(trailer_id);
	}

	out
}
