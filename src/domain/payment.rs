use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use crate::domain::processor::ProcessorType;

/// A payment as accepted at ingress. `correlation_id` is opaque: whatever
/// string the caller sent is carried through to the processors untouched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
	pub correlation_id: String,
	pub amount:         f64,
	#[serde(
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub requested_at:   Option<OffsetDateTime>,
}

impl Payment {
	pub fn new(correlation_id: impl Into<String>, amount: f64) -> Self {
		Self {
			correlation_id: correlation_id.into(),
			amount,
			requested_at: None,
		}
	}

	/// Copy of this payment stamped with the time of a delivery attempt.
	pub fn stamped_at(&self, requested_at: OffsetDateTime) -> Payment {
		Payment {
			requested_at: Some(requested_at),
			..self.clone()
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistedPayment {
	pub correlation_id: String,
	pub amount:         f64,
	pub processed_by:   ProcessorType,
	pub processed_at:   OffsetDateTime,
}
