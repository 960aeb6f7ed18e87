use serde_json::Value;

use yardwatch_domain::FeedItem;

use crate::{Error, FeedClient, Result};

impl FeedClient {
	/// Fetches the raw `report` array of the live GPS feed.
	pub async fn fetch_report(&self) -> Result<Vec<FeedItem>> {
		let res = self.client.get(&self.gps_url).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_report(json)
	}
}

pub fn parse_report(json: Value) -> Result<Vec<FeedItem>> {
	let report = json
		.get("report")
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "GPS feed response is missing report array.".to_string(),
		})?;

	// Entries that are not objects decode to an empty item and fall out of the yard.
	Ok(report
		.iter()
		.map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_report_items_in_order() {
		let json = serde_json::json!({
			"report": [
				{ "vehicleexternalid": "T-1", "objectlatitude": -3387000, "objectlongitude": 15120000 },
				"garbage",
				{ "vehicleexternalid": "T-2" }
			]
		});
		let items = parse_report(json).expect("parse failed");

		assert_eq!(items.len(), 3);
		assert_eq!(items[0].vehicleexternalid, Some(serde_json::json!("T-1")));
		assert!(items[1].vehicleexternalid.is_none());
		assert!(items[2].objectlatitude.is_none());
	}

	#[test]
	fn rejects_missing_report() {
		let err = parse_report(serde_json::json!({ "reports": [] })).expect_err("expected error");

		assert!(matches!(err, Error::InvalidResponse { .. }));
		assert!(parse_report(serde_json::json!({ "report": {} })).is_err());
	}
}
