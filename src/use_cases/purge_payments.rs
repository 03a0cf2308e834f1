use log::info;

use crate::domain::repository::{PaymentRepository, RepositoryError};

/// Forgets every persisted payment of both processors. Queued payments and
/// processor health are left alone.
#[derive(Clone)]
pub struct PurgePaymentsUseCase<R: PaymentRepository> {
	payment_repo: R,
}

impl<R: PaymentRepository> PurgePaymentsUseCase<R> {
	pub fn new(payment_repo: R) -> Self {
		Self { payment_repo }
	}

	pub async fn execute(&self) -> Result<(), RepositoryError> {
		self.payment_repo.purge().await?;
		info!("Persisted payments of every processor were purged");
		Ok(())
	}
}
