use std::future::Future;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::domain::health_store::HealthStore;
use crate::domain::payment::Payment;
use crate::domain::processor::ProcessorType;
use crate::domain::queue::{Queue, QueueError, Received};
use crate::domain::repository::PaymentRepository;
use crate::domain::routing::{BypassSource, RoutingPolicy};
use crate::use_cases::process_payment::ProcessPaymentUseCase;

const QUEUE_UNAVAILABLE_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
	/// Nothing arrived within the pop timeout, or the queue was unreachable.
	Idle,
	/// The payload could not be decoded and was discarded.
	Dropped,
	Processed(ProcessorType),
	/// Every candidate failed (or none was picked); the payload went back to
	/// the tail of the queue byte for byte.
	Requeued,
	RequeueFailed,
}

pub struct PaymentWorker<Q, R, H, B>
where
	Q: Queue<Payment>,
	R: PaymentRepository,
	H: HealthStore,
	B: BypassSource,
{
	queue:                    Q,
	health_store:             H,
	process_payment_use_case: ProcessPaymentUseCase<R, H>,
	policy:                   RoutingPolicy,
	bypass:                   B,
}

impl<Q, R, H, B> PaymentWorker<Q, R, H, B>
where
	Q: Queue<Payment>,
	R: PaymentRepository,
	H: HealthStore,
	B: BypassSource,
{
	pub fn new(
		queue: Q,
		health_store: H,
		process_payment_use_case: ProcessPaymentUseCase<R, H>,
		policy: RoutingPolicy,
		bypass: B,
	) -> Self {
		Self {
			queue,
			health_store,
			process_payment_use_case,
			policy,
			bypass,
		}
	}

	pub async fn run(mut self) {
		loop {
			self.process_next().await;
		}
	}

	pub async fn process_next(&mut self) -> WorkOutcome {
		let Received { message, raw } = match self.queue.pop().await {
			Ok(Some(received)) => received,
			Ok(None) => return WorkOutcome::Idle,
			Err(QueueError::Malformed(e)) => {
				warn!("Dropping malformed payment message: {e}");
				return WorkOutcome::Dropped;
			}
			Err(e) => {
				error!("Failed to pop from payments queue: {e}");
				sleep(QUEUE_UNAVAILABLE_BACKOFF).await;
				return WorkOutcome::Idle;
			}
		};

		let payment = &message.body;

		let default_status =
			self.health_store.status_of(ProcessorType::Default).await;
		let fallback_status =
			self.health_store.status_of(ProcessorType::Fallback).await;

		let candidates =
			self.policy
				.route(&default_status, &fallback_status, &mut self.bypass);

		for processor in candidates {
			if self
				.process_payment_use_case
				.execute(payment, processor)
				.await
				.is_ok()
			{
				return WorkOutcome::Processed(processor);
			}
		}

		debug!(
			"Payment {} could not be processed by any processor. Re-queueing.",
			payment.correlation_id
		);
		match self.queue.push_raw(raw).await {
			Ok(()) => WorkOutcome::Requeued,
			Err(e) => {
				error!(
					"Failed to re-queue payment {}: {e}",
					payment.correlation_id
				);
				WorkOutcome::RequeueFailed
			}
		}
	}
}

/// Starts `count` independent workers. `build` is called once per worker so
/// that each one can own its queue connection.
pub async fn spawn_payment_workers<F, Fut, Q, R, H, B>(
	count: usize,
	mut build: F,
) -> Vec<JoinHandle<()>>
where
	F: FnMut(usize) -> Fut,
	Fut: Future<Output = Option<PaymentWorker<Q, R, H, B>>>,
	Q: Queue<Payment>,
	R: PaymentRepository,
	H: HealthStore,
	B: BypassSource + 'static,
{
	let mut handles = Vec::with_capacity(count);

	for worker_id in 0..count {
		match build(worker_id).await {
			Some(worker) => handles.push(tokio::spawn(worker.run())),
			None => error!("Payment worker {worker_id} could not be started"),
		}
	}

	info!("{} payment workers started", handles.len());
	handles
}
