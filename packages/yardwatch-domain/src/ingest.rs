use serde::Deserialize;
use serde_json::Value;

use crate::{
	geofence::Yard,
	model::{Location, TrailerRecord, UNKNOWN_SERVICE},
};

/// One uploaded spreadsheet row. Cells arrive as whatever scalar the sheet held.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BatchRow {
	#[serde(default)]
	pub id: Option<Value>,
	#[serde(default, rename = "lastService")]
	pub last_service: Option<Value>,
	#[serde(default)]
	pub lat: Option<Value>,
	#[serde(default)]
	pub lng: Option<Value>,
}

/// Turns uploaded rows into records. Rows are never dropped; unparsable coordinates become NaN and
/// classify as out of the yard.
pub fn ingest_rows(yard: &Yard, rows: &[BatchRow]) -> Vec<TrailerRecord> {
	rows.iter()
		.enumerate()
		.map(|(index, row)| {
			let location = Location {
				lat: row.lat.as_ref().map(parse_float).unwrap_or(f64::NAN),
				lng: row.lng.as_ref().map(parse_float).unwrap_or(f64::NAN),
			};
			let id = row
				.id
				.as_ref()
				.and_then(truthy_text)
				.unwrap_or_else(|| format!("TRAILER-{index}"));
			let last_service = row
				.last_service
				.as_ref()
				.and_then(truthy_text)
				.unwrap_or_else(|| UNKNOWN_SERVICE.to_string());

			TrailerRecord::new(yard, id, last_service, location)
		})
		.collect()
}

/// Numeric value of a cell, NaN when it holds no number.
pub(crate) fn parse_float(value: &Value) -> f64 {
	match value {
		Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
		Value::String(text) => parse_float_prefix(text),
		_ => f64::NAN,
	}
}

/// Parses the longest leading decimal literal of `text`, ignoring whatever trails it.
pub(crate) fn parse_float_prefix(text: &str) -> f64 {
	let text = text.trim_start();
	let bytes = text.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end += 1;
	}
	if text[end..].starts_with("Infinity") {
		return if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
	}

	let int_digits = count_digits(&bytes[end..]);

	end += int_digits;

	let mut frac_digits = 0;

	if bytes.get(end) == Some(&b'.') {
		frac_digits = count_digits(&bytes[end + 1..]);

		if int_digits > 0 || frac_digits > 0 {
			end += 1 + frac_digits;
		}
	}
	if int_digits == 0 && frac_digits == 0 {
		return f64::NAN;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exp_end = end + 1;

		if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
			exp_end += 1;
		}

		let exp_digits = count_digits(&bytes[exp_end..]);

		if exp_digits > 0 {
			end = exp_end + exp_digits;
		}
	}

	text[..end].parse().unwrap_or(f64::NAN)
}

/// Text of a cell unless it is empty, null, `false` or zero.
pub(crate) fn truthy_text(value: &Value) -> Option<String> {
	match value {
		Value::Null | Value::Bool(false) => None,
		Value::String(text) if text.is_empty() => None,
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => {
			if let Some(int) = number.as_i64() {
				return (int != 0).then(|| int.to_string());
			}
			if let Some(uint) = number.as_u64() {
				return Some(uint.to_string());
			}

			let float = number.as_f64()?;

			if float == 0.0 {
				None
			} else if float.fract() == 0.0 && float.abs() < 1e15 {
				Some(format!("{float:.0}"))
			} else {
				Some(float.to_string())
			}
		},
		other => Some(other.to_string()),
	}
}

fn count_digits(bytes: &[u8]) -> usize {
	bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
