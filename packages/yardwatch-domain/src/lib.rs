pub mod geofence;
pub mod ingest;
pub mod live;
pub mod merge;
pub mod model;
pub mod transition;

pub use geofence::{EARTH_RADIUS_KM, Yard, haversine_km};
pub use ingest::{BatchRow, ingest_rows};
pub use live::{COORDINATE_SCALE, FeedItem, LiveSnapshot, decode_report};
pub use merge::{MergeOptions, merge};
pub use model::{LivePosition, Location, TrailerRecord, UNKNOWN_SERVICE, ZoneStatus};
pub use transition::TransitionTracker;
