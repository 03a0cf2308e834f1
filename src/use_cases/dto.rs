use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::repository::PaymentSummary;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreatePaymentCommand {
	pub correlation_id: String,
	pub amount:         f64,
}

#[derive(Debug, Clone, Default)]
pub struct GetPaymentSummaryQuery {
	pub from: Option<OffsetDateTime>,
	pub to:   Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentsSummaryResponse {
	pub default:  PaymentSummary,
	pub fallback: PaymentSummary,
}
