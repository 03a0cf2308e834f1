use std::net::TcpListener;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::Value;

struct ProcessorState {
	payments_status: AtomicU16,
	health_status:   AtomicU16,
	health_body:     Mutex<String>,
	received:        Mutex<Vec<Value>>,
	health_checks:   AtomicUsize,
}

/// Stand-in for a payment processor, serving `POST /payments` and
/// `GET /payments/service-health` on an ephemeral local port.
pub struct FakeProcessor {
	pub url: String,
	state:   Arc<ProcessorState>,
	handle:  ServerHandle,
}

impl FakeProcessor {
	/// Must be called from within an actix system (`#[actix_web::test]`).
	pub async fn start() -> FakeProcessor {
		let state = Arc::new(ProcessorState {
			payments_status: AtomicU16::new(200),
			health_status:   AtomicU16::new(200),
			health_body:     Mutex::new(
				r#"{"failing":false,"minResponseTime":0}"#.to_string(),
			),
			received:        Mutex::new(Vec::new()),
			health_checks:   AtomicUsize::new(0),
		});

		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();

		let app_state = web::Data::from(state.clone());
		let server = HttpServer::new(move || {
			App::new()
				.app_data(app_state.clone())
				.route("/payments", web::post().to(receive_payment))
				.route("/payments/service-health", web::get().to(service_health))
		})
		.workers(1)
		.disable_signals()
		.shutdown_timeout(0)
		.listen(listener)
		.unwrap()
		.run();

		let handle = server.handle();
		actix_web::rt::spawn(server);

		FakeProcessor {
			url: format!("http://127.0.0.1:{port}"),
			state,
			handle,
		}
	}

	pub fn reply_to_payments_with(&self, status: u16) {
		self.state.payments_status.store(status, Ordering::SeqCst);
	}

	pub fn reply_to_health_with(&self, status: u16, body: &str) {
		self.state.health_status.store(status, Ordering::SeqCst);
		*self.state.health_body.lock().unwrap() = body.to_string();
	}

	pub fn received_payments(&self) -> Vec<Value> {
		self.state.received.lock().unwrap().clone()
	}

	pub fn health_checks(&self) -> usize {
		self.state.health_checks.load(Ordering::SeqCst)
	}

	pub async fn stop(self) {
		self.handle.stop(false).await;
	}
}

async fn receive_payment(
	state: web::Data<ProcessorState>,
	body: web::Json<Value>,
) -> HttpResponse {
	state.received.lock().unwrap().push(body.into_inner());
	let status = StatusCode::from_u16(state.payments_status.load(Ordering::SeqCst))
		.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	HttpResponse::build(status)
		.json(serde_json::json!({ "message": "payment processed successfully" }))
}

async fn service_health(state: web::Data<ProcessorState>) -> HttpResponse {
	state.health_checks.fetch_add(1, Ordering::SeqCst);
	let status = StatusCode::from_u16(state.health_status.load(Ordering::SeqCst))
		.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	let body = state.health_body.lock().unwrap().clone();
	HttpResponse::build(status)
		.content_type("application/json")
		.body(body)
}
