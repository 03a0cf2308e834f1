use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::payment::PersistedPayment;
use crate::domain::processor::ProcessorType;

#[derive(Debug, Display, Error)]
pub enum RepositoryError {
	#[display("payment repository is unavailable: {_0}")]
	Unavailable(#[error(not(source))] String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct PaymentSummary {
	#[serde(rename = "totalRequests")]
	pub total_requests: usize,
	#[serde(rename = "totalAmount")]
	pub total_amount:   f64,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
	async fn save(&self, payment: PersistedPayment) -> Result<(), RepositoryError>;

	/// Aggregates payments of `processor` whose `processed_at` falls in
	/// `[from, to)`. A missing bound leaves that side of the range open.
	async fn summary_of(
		&self,
		processor: ProcessorType,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<PaymentSummary, RepositoryError>;

	async fn purge(&self) -> Result<(), RepositoryError>;
}
