pub mod alert;
pub mod engine;
pub mod poller;
pub mod store;

mod error;

pub use alert::AlertDispatcher;
pub use engine::{CycleOutcome, FleetEngine};
pub use error::{Error, Result};
pub use poller::{CancelToken, CycleResult, LiveFeedPoller, PollerHandle, PollerStats, PollerStatus};
pub use store::RecordStore;

use std::{future::Future, pin::Pin, sync::Arc};

use yardwatch_domain::FeedItem;
use yardwatch_providers::FeedClient;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where live positions come from.
pub trait PositionSource
where
	Self: Send + Sync,
{
	fn fetch(&self) -> BoxFuture<'_, Result<Vec<FeedItem>>>;
}

/// Where arrival alerts go.
pub trait AlertSink
where
	Self: Send + Sync,
{
	fn alert<'a>(&'a self, trailer_id: &'a str) -> BoxFuture<'a, Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub source: Arc<dyn PositionSource>,
	pub alerts: Arc<dyn AlertSink>,
}
impl Providers {
	pub fn new(source: Arc<dyn PositionSource>, alerts: Arc<dyn AlertSink>) -> Self {
		Self { source, alerts }
	}

	/// Feed and alerts both served by the configured fleet backend.
	pub fn http(cfg: &yardwatch_config::Feed) -> Result<Self> {
		let client = FeedClient::new(cfg)?;

		tracing::info!(
			gps_url = client.gps_url(),
			alert_url = client.alert_url(),
			"Fleet backend client ready."
		);

		let client = Arc::new(HttpProviders { client });

		Ok(Self { source: client.clone(), alerts: client })
	}
}

struct HttpProviders {
	client: FeedClient,
}

impl PositionSource for HttpProviders {
	fn fetch(&self) -> BoxFuture<'_, Result<Vec<FeedItem>>> {
		Box::pin(async move { Ok(self.client.fetch_report().await?) })
	}
}

impl AlertSink for HttpProviders {
	fn alert<'a>(&'a self, trailer_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(self.client.send_alert(trailer_id).await?) })
	}
}
