use actix_web::web;

use crate::adapters::web::payments_handler::payments;
use crate::adapters::web::payments_purge_handler::payments_purge;
use crate::adapters::web::payments_summary_handler::payments_summary;
use crate::domain::payment::Payment;
use crate::domain::queue::Queue;
use crate::domain::repository::PaymentRepository;

/// Registers the public endpoints. The matching use cases must be provided as
/// app data.
pub fn configure<Q, R>(cfg: &mut web::ServiceConfig)
where
	Q: Queue<Payment>,
	R: PaymentRepository,
{
	cfg.service(web::resource("/payments").route(web::post().to(payments::<Q>)))
		.service(
			web::resource("/payments-summary")
				.route(web::get().to(payments_summary::<R>)),
		)
		.service(
			web::resource("/purge-payments")
				.route(web::post().to(payments_purge::<R>)),
		);
}
