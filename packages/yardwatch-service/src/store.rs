use std::sync::{Arc, RwLock};

use yardwatch_domain::TrailerRecord;

/// The most recent uploaded batch. Uploads replace it wholesale.
#[derive(Debug, Default)]
pub struct RecordStore {
	records: RwLock<Arc<Vec<TrailerRecord>>>,
}
impl RecordStore {
	pub fn replace(&self, records: Vec<TrailerRecord>) -> Arc<Vec<TrailerRecord>> {
		let records = Arc::new(records);
		let mut slot = self.records.write().unwrap_or_else(|err| err.into_inner());

		*slot = records.clone();

		records
	}

	pub fn snapshot(&self) -> Arc<Vec<TrailerRecord>> {
		self.records.read().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
