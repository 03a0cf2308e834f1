use std::time::Duration;

use config::Environment;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub redis_url: String,
	pub default_payment_processor_url: String,
	pub fallback_payment_processor_url: String,
	pub server_keepalive: u64,
	pub server_port: u16,
	pub num_workers: usize,
	pub processor_timeout_ms: u64,
	pub store_timeout_ms: u64,
	pub queue_pop_timeout_secs: f64,
	pub health_check_interval_ms: u64,
	pub health_check_offset_ms: u64,
	pub coordinator_ttl_secs: u64,
	pub coordinator_retry_secs: Option<u64>,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		Self::load_from(Environment::with_prefix("APP"))
	}

	pub fn load_from(source: Environment) -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("server_port", 9999)?
			.set_default("num_workers", 16)?
			.set_default("processor_timeout_ms", 200)?
			.set_default("store_timeout_ms", 50)?
			.set_default("queue_pop_timeout_secs", 0.2)?
			.set_default("health_check_interval_ms", 5000)?
			.set_default("health_check_offset_ms", 2500)?
			.set_default("coordinator_ttl_secs", 30)?
			.add_source(source)
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn processor_timeout(&self) -> Duration {
		Duration::from_millis(self.processor_timeout_ms)
	}

	pub fn store_timeout(&self) -> Duration {
		Duration::from_millis(self.store_timeout_ms)
	}

	pub fn health_check_interval(&self) -> Duration {
		Duration::from_millis(self.health_check_interval_ms)
	}

	pub fn health_check_offset(&self) -> Duration {
		Duration::from_millis(self.health_check_offset_ms)
	}

	pub fn coordinator_ttl(&self) -> Duration {
		Duration::from_secs(self.coordinator_ttl_secs)
	}

	pub fn coordinator_retry(&self) -> Option<Duration> {
		self.coordinator_retry_secs.map(Duration::from_secs)
	}
}
