use std::time::Duration;

use log::{error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};

use crate::domain::health_store::HealthStore;
use crate::domain::processor::ProcessorType;
use crate::use_cases::health_check::HealthCheckUseCase;

#[derive(Debug, Clone)]
pub struct HealthCheckSettings {
	pub interval:        Duration,
	/// Delay of the fallback schedule relative to the default one.
	pub offset:          Duration,
	pub coordinator_ttl: Duration,
	/// When `None`, an instance that loses the election never polls.
	pub standby_retry:   Option<Duration>,
}

/// Polls processor health on behalf of the whole fleet, but only while this
/// instance holds the coordinator lock.
pub async fn health_check_worker<H>(
	health_check_use_case: HealthCheckUseCase<H>,
	health_store: H,
	owner: String,
	settings: HealthCheckSettings,
) where
	H: HealthStore + Clone,
{
	loop {
		if elect_coordinator(&health_store, &owner, settings.coordinator_ttl).await {
			info!("Instance {owner} is the health check coordinator");
			coordinate(&health_check_use_case, &health_store, &owner, &settings)
				.await;
			warn!("Instance {owner} lost the health check coordinator lock");
		} else {
			info!("Another instance is the owner of the health check task");
		}

		match settings.standby_retry {
			Some(retry) => sleep(retry).await,
			None => return,
		}
	}
}

pub async fn elect_coordinator<H: HealthStore>(
	health_store: &H,
	owner: &str,
	ttl: Duration,
) -> bool {
	match health_store.try_acquire_coordinator(owner, ttl).await {
		Ok(acquired) => acquired,
		Err(e) => {
			error!("Could not take part in the coordinator election: {e}");
			false
		}
	}
}

/// Runs both probe schedules and keeps renewing the lock. Returns once the
/// lock is lost.
async fn coordinate<H>(
	health_check_use_case: &HealthCheckUseCase<H>,
	health_store: &H,
	owner: &str,
	settings: &HealthCheckSettings,
) where
	H: HealthStore + Clone,
{
	let probes = [
		spawn_probe(
			health_check_use_case.clone(),
			ProcessorType::Default,
			settings.interval,
			Duration::ZERO,
		),
		spawn_probe(
			health_check_use_case.clone(),
			ProcessorType::Fallback,
			settings.interval,
			settings.offset,
		),
	];

	let mut renewal =
		interval((settings.coordinator_ttl / 3).max(Duration::from_millis(1)));
	renewal.set_missed_tick_behavior(MissedTickBehavior::Delay);
	renewal.tick().await;

	loop {
		renewal.tick().await;

		match health_store
			.renew_coordinator(owner, settings.coordinator_ttl)
			.await
		{
			Ok(true) => {}
			Ok(false) => {
				if !elect_coordinator(health_store, owner, settings.coordinator_ttl)
					.await
				{
					break;
				}
			}
			Err(e) => warn!("Could not renew the coordinator lock: {e}"),
		}
	}

	for probe in probes {
		probe.abort();
	}
}

fn spawn_probe<H>(
	health_check_use_case: HealthCheckUseCase<H>,
	processor: ProcessorType,
	every: Duration,
	offset: Duration,
) -> JoinHandle<()>
where
	H: HealthStore + Clone,
{
	tokio::spawn(async move {
		sleep(offset).await;

		let mut ticker = interval(every.max(Duration::from_millis(1)));
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			ticker.tick().await;
			health_check_use_case.execute(processor).await;
		}
	})
}
