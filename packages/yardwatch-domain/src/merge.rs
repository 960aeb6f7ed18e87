use crate::{live::LiveSnapshot, model::TrailerRecord};

#[derive(Clone, Copy, Debug, Default)]
pub struct MergeOptions {
	/// Append live positions without an uploaded record, after the uploaded ones.
	pub include_live_only: bool,
}
impl From<&yardwatch_config::Merge> for MergeOptions {
	fn from(cfg: &yardwatch_config::Merge) -> Self {
		Self { include_live_only: cfg.include_live_only }
	}
}

/// Lays live positions over uploaded records by id. Neither input is modified.
pub fn merge(
	records: &[TrailerRecord],
	live: &LiveSnapshot,
	options: MergeOptions,
) -> Vec<TrailerRecord> {
	let mut merged: Vec<TrailerRecord> = records
		.iter()
		.map(|record| match live.get(record.id()) {
			Some(position) => record.overlaid(position),
			None => record.clone(),
		})
		.collect();

	if options.include_live_only {
		let uploaded: std::collections::HashSet<&str> =
			records.iter().map(TrailerRecord::id).collect();

		merged.extend(
			live.iter()
				.filter(|position| !uploaded.contains(position.id()))
				.map(TrailerRecord::from_live),
		);
	}

	merged
}
