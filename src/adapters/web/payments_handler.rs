use actix_web::{HttpResponse, Responder, ResponseError, web};
use log::{debug, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{PaymentRequest, PaymentResponse};
use crate::domain::payment::Payment;
use crate::domain::queue::Queue;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::dto::CreatePaymentCommand;

const QUEUED: &str = "queued";

/// `POST /payments`: answers as soon as the payment is queued.
pub async fn payments<Q: Queue<Payment>>(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase<Q>>,
) -> impl Responder {
	let request = payload.into_inner();
	let command = CreatePaymentCommand {
		correlation_id: request.correlation_id.clone(),
		amount:         request.amount,
	};

	match create_payment_use_case.execute(command).await {
		Ok(_) => {
			debug!("Payment received and queued: {}", request.correlation_id);
			HttpResponse::Ok().json(PaymentResponse {
				payment: request,
				status:  QUEUED.to_string(),
			})
		}
		Err(e) => {
			warn!("Error queueing payment {}: {e}", request.correlation_id);
			ApiError::from(e).error_response()
		}
	}
}
