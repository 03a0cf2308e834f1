use log::debug;

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError};
use crate::use_cases::dto::CreatePaymentCommand;

/// Accepts a payment for asynchronous processing. Nothing is validated beyond
/// what deserialization already enforced; routing happens in the workers.
#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: Queue<Payment>> {
	payment_queue: Q,
}

impl<Q: Queue<Payment>> CreatePaymentUseCase<Q> {
	pub fn new(payment_queue: Q) -> Self {
		Self { payment_queue }
	}

	pub async fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<(), QueueError> {
		let message =
			Message::new(Payment::new(command.correlation_id, command.amount));
		debug!(
			"Queueing payment {} as message {}",
			message.body.correlation_id, message.id
		);

		self.payment_queue.push(message).await
	}
}
