use std::time::Duration;

use async_trait::async_trait;
use derive_more::{Display, Error};

use crate::domain::processor::{ProcessorStatus, ProcessorType};

#[derive(Debug, Display, Error)]
pub enum HealthStoreError {
	#[display("health store is unavailable: {_0}")]
	Unavailable(#[error(not(source))] String),
	#[display("health store did not answer within {_0:?}")]
	Timeout(#[error(not(source))] Duration),
}

/// Fleet-wide view of processor health plus the coordinator lock.
///
/// Every key is read and written independently; there is no atomicity across
/// the `failing` flag and the response time of a processor, and concurrent
/// writers race with last-write-wins semantics.
#[async_trait]
pub trait HealthStore: Send + Sync + 'static {
	/// Never fails: a missing key, a store error or a timeout all yield
	/// `ProcessorStatus::default()`.
	async fn status_of(&self, processor: ProcessorType) -> ProcessorStatus;

	async fn set_failing(
		&self,
		processor: ProcessorType,
		failing: bool,
	) -> Result<(), HealthStoreError>;

	async fn set_min_response_time(
		&self,
		processor: ProcessorType,
		min_response_time: u64,
	) -> Result<(), HealthStoreError>;

	/// Returns `true` only when this call created the lock.
	async fn try_acquire_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError>;

	/// Extends the lock TTL, but only while `owner` still holds it.
	async fn renew_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError>;
}
