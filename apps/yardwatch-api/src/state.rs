use std::sync::Arc;

use yardwatch_service::{FleetEngine, PollerStats};

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<FleetEngine>,
	pub poller: Arc<PollerStats>,
}
impl AppState {
	pub fn new(engine: Arc<FleetEngine>, poller: Arc<PollerStats>) -> Self {
		Self { engine, poller }
	}
}
