use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use tokio::time::timeout;

use crate::domain::health_store::{HealthStore, HealthStoreError};
use crate::domain::processor::{ProcessorStatus, ProcessorType};
use crate::infrastructure::config::redis::{COORDINATOR_KEY, health_key_of};

const RENEW_COORDINATOR_LUA: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("PEXPIRE", KEYS[1], ARGV[2])
end
return 0
"#;

impl From<RedisError> for HealthStoreError {
	fn from(e: RedisError) -> Self {
		HealthStoreError::Unavailable(e.to_string())
	}
}

#[derive(Clone)]
pub struct RedisHealthStore {
	connection: ConnectionManager,
	timeout:    Duration,
}

impl RedisHealthStore {
	pub fn new(connection: ConnectionManager, timeout: Duration) -> Self {
		Self {
			connection,
			timeout,
		}
	}

	async fn bounded<T, F>(&self, operation: F) -> Result<T, HealthStoreError>
	where
		F: Future<Output = Result<T, RedisError>>,
	{
		match timeout(self.timeout, operation).await {
			Ok(result) => result.map_err(HealthStoreError::from),
			Err(_) => Err(HealthStoreError::Timeout(self.timeout)),
		}
	}

	async fn read_status(
		&self,
		processor: ProcessorType,
	) -> Result<ProcessorStatus, HealthStoreError> {
		let mut con = self.connection.clone();
		let (failing, min_response_time): (Option<String>, Option<String>) = self
			.bounded(con.hget(health_key_of(processor.as_str()), &[
				"failing",
				"min_response_time",
			]))
			.await?;

		Ok(ProcessorStatus {
			failing:           failing.as_deref() == Some("1"),
			min_response_time: min_response_time
				.and_then(|value| value.parse().ok())
				.unwrap_or_default(),
		})
	}
}

#[async_trait]
impl HealthStore for RedisHealthStore {
	async fn status_of(&self, processor: ProcessorType) -> ProcessorStatus {
		self.read_status(processor).await.unwrap_or_else(|e| {
			warn!("Could not read {processor} health, assuming healthy: {e}");
			ProcessorStatus::default()
		})
	}

	async fn set_failing(
		&self,
		processor: ProcessorType,
		failing: bool,
	) -> Result<(), HealthStoreError> {
		let mut con = self.connection.clone();
		self.bounded(con.hset::<_, _, _, ()>(
			health_key_of(processor.as_str()),
			"failing",
			if failing { "1" } else { "0" },
		))
		.await
	}

	async fn set_min_response_time(
		&self,
		processor: ProcessorType,
		min_response_time: u64,
	) -> Result<(), HealthStoreError> {
		let mut con = self.connection.clone();
		self.bounded(con.hset::<_, _, _, ()>(
			health_key_of(processor.as_str()),
			"min_response_time",
			min_response_time,
		))
		.await
	}

	async fn try_acquire_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError> {
		let mut con = self.connection.clone();
		let created: Option<String> = self
			.bounded(
				redis::cmd("SET")
					.arg(COORDINATOR_KEY)
					.arg(owner)
					.arg("NX")
					.arg("PX")
					.arg(ttl.as_millis() as u64)
					.query_async(&mut con),
			)
			.await?;

		Ok(created.is_some())
	}

	async fn renew_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError> {
		let mut con = self.connection.clone();
		let script = Script::new(RENEW_COORDINATOR_LUA);
		let renewed: i64 = self
			.bounded(
				script
					.key(COORDINATOR_KEY)
					.arg(owner)
					.arg(ttl.as_millis() as u64)
					.invoke_async(&mut con),
			)
			.await?;

		Ok(renewed == 1)
	}
}
