use log::{debug, info, warn};
use reqwest::{Client, StatusCode};

use crate::domain::health_store::HealthStore;
use crate::domain::processor::{
	ProcessorEndpoints, ProcessorStatus, ProcessorType,
};

/// What a single health probe concluded, and therefore what was written.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
	/// Both fields were stored as reported by the processor.
	Reported(ProcessorStatus),
	/// The processor answered with an error; only `failing = true` was stored.
	Failing(u16),
	/// Rate limited. Overload is not an outage, nothing was stored.
	Overloaded,
	/// The body could not be read as a health report, nothing was stored.
	Unreadable,
	/// No response at all, nothing was stored.
	Unreachable,
}

#[derive(Clone)]
pub struct HealthCheckUseCase<H: HealthStore> {
	health_store: H,
	http_client:  Client,
	endpoints:    ProcessorEndpoints,
}

impl<H: HealthStore> HealthCheckUseCase<H> {
	pub fn new(
		health_store: H,
		http_client: Client,
		endpoints: ProcessorEndpoints,
	) -> Self {
		Self {
			health_store,
			http_client,
			endpoints,
		}
	}

	pub async fn execute(&self, processor: ProcessorType) -> ProbeOutcome {
		let health_url =
			format!("{}/payments/service-health", self.endpoints.url_of(processor));

		let response = match self.http_client.get(&health_url).send().await {
			Ok(response) => response,
			Err(e) => {
				warn!("Failed to reach {processor} health endpoint: {e}");
				return ProbeOutcome::Unreachable;
			}
		};

		let status = response.status();

		if status == StatusCode::TOO_MANY_REQUESTS {
			warn!("Health check detected {processor} processor is overloaded");
			return ProbeOutcome::Overloaded;
		}

		if status.as_u16() >= 400 {
			info!("Health check detected {processor} processor is failing: {status}");
			if let Err(e) = self.health_store.set_failing(processor, true).await {
				warn!("Could not store {processor} failing status: {e}");
			}
			return ProbeOutcome::Failing(status.as_u16());
		}

		let reported = match response.json::<ProcessorStatus>().await {
			Ok(reported) => reported,
			Err(e) => {
				warn!("Failed to parse {processor} health check response: {e}");
				return ProbeOutcome::Unreadable;
			}
		};

		debug!(
			"{processor} processor health: failing={}, min_response_time={}",
			reported.failing, reported.min_response_time
		);

		if let Err(e) = self
			.health_store
			.set_failing(processor, reported.failing)
			.await
		{
			warn!("Could not store {processor} failing status: {e}");
		}
		if let Err(e) = self
			.health_store
			.set_min_response_time(processor, reported.min_response_time)
			.await
		{
			warn!("Could not store {processor} min response time: {e}");
		}

		ProbeOutcome::Reported(reported)
	}
}
