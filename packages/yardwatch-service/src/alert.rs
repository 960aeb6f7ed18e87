use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::AlertSink;

/// Fires arrival alerts on detached tasks. One attempt each; failures are logged and dropped.
#[derive(Clone)]
pub struct AlertDispatcher {
	sink: Arc<dyn AlertSink>,
}
impl AlertDispatcher {
	pub fn new(sink: Arc<dyn AlertSink>) -> Self {
		Self { sink }
	}

	pub fn dispatch(&self, trailer_id: String) -> JoinHandle<()> {
		let sink = self.sink.clone();

		tokio::spawn(async move {
			match sink.alert(&trailer_id).await {
				Ok(()) => tracing::info!(trailer_id = %trailer_id, "Yard arrival alert sent."),
				Err(err) => {
					tracing::warn!(error = %err, trailer_id = %trailer_id, "Yard arrival alert failed.");
				},
			}
		})
	}
}
