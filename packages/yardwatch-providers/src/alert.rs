use serde::Serialize;

use crate::{FeedClient, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBody<'a> {
	pub trailer_id: &'a str,
}

impl FeedClient {
	/// Posts a single arrival alert. Callers own retry policy; there is none here.
	pub async fn send_alert(&self, trailer_id: &str) -> Result<()> {
		self.client
			.post(&self.alert_url)
			.json(&AlertBody { trailer_id })
			.send()
			.await?
			.error_for_status()?;

		Ok(())
	}
}
