use crate::model::{Location, ZoneStatus};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance in kilometers between two points given in degrees.
///
/// Any NaN input yields NaN.
pub fn haversine_km(from: Location, to: Location) -> f64 {
	let d_lat = (to.lat - from.lat).to_radians();
	let d_lng = (to.lng - from.lng).to_radians();
	let a = (d_lat / 2.0).sin().powi(2)
		+ from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

	EARTH_RADIUS_KM * c
}

/// A circular home zone. Membership is inclusive of the boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yard {
	center: Location,
	radius_km: f64,
}
impl Yard {
	pub fn new(center: Location, radius_km: f64) -> Self {
		Self { center, radius_km }
	}

	pub fn center(&self) -> Location {
		self.center
	}

	pub fn radius_km(&self) -> f64 {
		self.radius_km
	}

	pub fn distance_km(&self, lat: f64, lng: f64) -> f64 {
		haversine_km(self.center, Location { lat, lng })
	}

	pub fn contains(&self, lat: f64, lng: f64) -> bool {
		// NaN distances compare false, so unparsable coordinates fall outside.
		self.distance_km(lat, lng) <= self.radius_km
	}

	pub fn classify(&self, location: &Location) -> ZoneStatus {
		if self.contains(location.lat, location.lng) {
			ZoneStatus::InYard
		} else {
			ZoneStatus::OutForJob
		}
	}
}
impl From<&yardwatch_config::Yard> for Yard {
	fn from(cfg: &yardwatch_config::Yard) -> Self {
		Self::new(Location { lat: cfg.lat, lng: cfg.lng }, cfg.radius_km)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sydney() -> Yard {
		Yard::new(Location { lat: -33.870, lng: 151.200 }, 0.5)
	}

	#[test]
	fn distance_to_self_is_zero() {
		let center = sydney().center();

		assert_eq!(haversine_km(center, center), 0.0);
	}

	#[test]
	fn one_degree_of_latitude_is_about_111_km() {
		let distance = haversine_km(Location { lat: 0.0, lng: 0.0 }, Location { lat: 1.0, lng: 0.0 });

		assert!((distance - 111.195).abs() < 0.01, "Unexpected distance: {distance}");
	}

	#[test]
	fn nan_coordinates_are_outside() {
		let yard = sydney();

		assert!(!yard.contains(f64::NAN, 151.200));
		assert!(!yard.contains(-33.870, f64::NAN));
		assert!(!yard.contains(f64::NAN, f64::NAN));
	}

	#[test]
	fn built_from_config_section() {
		let yard = Yard::from(&yardwatch_config::Yard::default());

		assert_eq!(yard, sydney());
		assert_eq!(yard.radius_km(), 0.5);
	}
}
