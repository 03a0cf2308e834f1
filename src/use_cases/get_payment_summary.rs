use crate::domain::processor::ProcessorType;
use crate::domain::repository::{
	PaymentRepository, PaymentSummary, RepositoryError,
};
use crate::use_cases::dto::{GetPaymentSummaryQuery, PaymentsSummaryResponse};

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<R: PaymentRepository> {
	payment_repo: R,
}

impl<R: PaymentRepository> GetPaymentSummaryUseCase<R> {
	pub fn new(payment_repo: R) -> Self {
		Self { payment_repo }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummaryResponse, RepositoryError> {
		let default = self
			.payment_repo
			.summary_of(ProcessorType::Default, query.from, query.to)
			.await?;

		let fallback = self
			.payment_repo
			.summary_of(ProcessorType::Fallback, query.from, query.to)
			.await?;

		Ok(PaymentsSummaryResponse {
			default:  rounded_to_cents(default),
			fallback: rounded_to_cents(fallback),
		})
	}
}

fn rounded_to_cents(summary: PaymentSummary) -> PaymentSummary {
	PaymentSummary {
		total_amount: (summary.total_amount * 100.0).round() / 100.0,
		..summary
	}
}
