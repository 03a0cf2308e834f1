use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /payments`. Both fields are required; the correlation id is
/// any string chosen by the caller.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: String,
	pub amount:         f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentResponse {
	pub payment: PaymentRequest,
	pub status:  String,
}

/// Query of `GET /payments-summary`, bounds as RFC 3339 timestamps.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PaymentsSummaryFilter {
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub to:   Option<OffsetDateTime>,
}
