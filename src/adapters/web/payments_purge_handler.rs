use actix_web::{HttpResponse, Responder, ResponseError, web};
use log::{error, info};

use crate::adapters::web::errors::ApiError;
use crate::domain::repository::PaymentRepository;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

/// `POST /purge-payments`
pub async fn payments_purge<R: PaymentRepository>(
	purge_use_case: web::Data<PurgePaymentsUseCase<R>>,
) -> impl Responder {
	info!("Received request to purge payments");
	match purge_use_case.execute().await {
		Ok(_) => {
			info!("Payments purged successfully");
			HttpResponse::Ok().body("Payments purged successfully")
		}
		Err(e) => {
			error!("Failed to purge payments: {e}");
			ApiError::InternalServerError.error_response()
		}
	}
}
