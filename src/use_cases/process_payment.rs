use derive_more::{Display, Error};
use log::{debug, error, warn};
use reqwest::Client;
use time::OffsetDateTime;

use crate::domain::health_store::HealthStore;
use crate::domain::payment::{Payment, PersistedPayment};
use crate::domain::processor::{ProcessorEndpoints, ProcessorType};
use crate::domain::repository::PaymentRepository;

#[derive(Debug, Display, Error)]
pub enum PaymentProcessingError {
	#[display("processor rejected the payment with status {_0}")]
	Rejected(#[error(not(source))] u16),
	#[display("processor could not be reached: {_0}")]
	Transport(#[error(not(source))] String),
}

/// Delivers a payment to one processor and records the result.
#[derive(Clone)]
pub struct ProcessPaymentUseCase<R: PaymentRepository, H: HealthStore> {
	payment_repo: R,
	health_store: H,
	http_client:  Client,
	endpoints:    ProcessorEndpoints,
}

impl<R: PaymentRepository, H: HealthStore> ProcessPaymentUseCase<R, H> {
	pub fn new(
		payment_repo: R,
		health_store: H,
		http_client: Client,
		endpoints: ProcessorEndpoints,
	) -> Self {
		Self {
			payment_repo,
			health_store,
			http_client,
			endpoints,
		}
	}

	/// A successful delivery is final even if persisting it fails: the
	/// processor already charged it, so retrying would charge twice.
	pub async fn execute(
		&self,
		payment: &Payment,
		processor: ProcessorType,
	) -> Result<(), PaymentProcessingError> {
		let requested_at = OffsetDateTime::now_utc();
		let attempt = payment.stamped_at(requested_at);

		let result = self
			.http_client
			.post(format!("{}/payments", self.endpoints.url_of(processor)))
			.json(&attempt)
			.send()
			.await;

		let response = match result {
			Ok(response) => response,
			Err(e) => {
				warn!(
					"Failed to send payment {} to {processor} processor: {e}",
					payment.correlation_id
				);
				self.report_health(processor, true).await;
				return Err(PaymentProcessingError::Transport(e.to_string()));
			}
		};

		let status = response.status().as_u16();
		if status >= 400 {
			warn!(
				"{processor} processor rejected payment {} with status {status}",
				payment.correlation_id
			);
			self.report_health(processor, true).await;
			return Err(PaymentProcessingError::Rejected(status));
		}

		debug!(
			"Payment {} processed by {processor} processor",
			payment.correlation_id
		);
		self.report_health(processor, false).await;

		let record = PersistedPayment {
			correlation_id: payment.correlation_id.clone(),
			amount: payment.amount,
			processed_by: processor,
			processed_at: requested_at,
		};
		if let Err(e) = self.payment_repo.save(record).await {
			error!(
				"Payment {} was processed by {processor} but could not be stored: \
				 {e}",
				payment.correlation_id
			);
		}

		Ok(())
	}

	/// Best-effort status update; a failed write is logged and dropped.
	async fn report_health(&self, processor: ProcessorType, failing: bool) {
		if let Err(e) = self.health_store.set_failing(processor, failing).await {
			warn!("Could not mark {processor} processor failing={failing}: {e}");
		}
	}
}
