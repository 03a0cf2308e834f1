use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::{error, info};
use redis::aio::ConnectionManager;
use reqwest::Client;
use uuid::Uuid;

use crate::adapters::web::routes;
use crate::domain::processor::ProcessorEndpoints;
use crate::domain::routing::{RandomBypass, RoutingPolicy};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::persistence::redis_health_store::RedisHealthStore;
use crate::infrastructure::persistence::redis_payment_repository::RedisPaymentRepository;
use crate::infrastructure::queue::redis_payment_queue::PaymentQueue;
use crate::infrastructure::workers::health_check_worker::{
	HealthCheckSettings, health_check_worker,
};
use crate::infrastructure::workers::payment_processor_worker::{
	PaymentWorker, spawn_payment_workers,
};
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::health_check::HealthCheckUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

pub mod domain {
	pub mod health_store;
	pub mod payment;
	pub mod processor;
	pub mod queue;
	pub mod repository;
	pub mod routing;
}

pub mod use_cases {
	pub mod create_payment;
	pub mod dto;
	pub mod get_payment_summary;
	pub mod health_check;
	pub mod process_payment;
	pub mod purge_payments;
}

pub mod infrastructure {
	pub mod config {
		pub mod redis;
		pub mod settings;
	}
	pub mod persistence {
		pub mod redis_health_store;
		pub mod redis_payment_repository;
	}
	pub mod queue {
		pub mod redis_payment_queue;
	}
	pub mod workers {
		pub mod health_check_worker;
		pub mod payment_processor_worker;
	}
}

pub mod adapters {
	pub mod web {
		pub mod errors;
		pub mod payments_handler;
		pub mod payments_purge_handler;
		pub mod payments_summary_handler;
		pub mod routes;
		pub mod schema;
	}
}

pub async fn run(config: Arc<Config>) -> io::Result<()> {
	let redis_client =
		redis::Client::open(config.redis_url.as_str()).map_err(io::Error::other)?;
	let connection = ConnectionManager::new(redis_client.clone())
		.await
		.map_err(io::Error::other)?;

	let http_client = Client::builder()
		.timeout(config.processor_timeout())
		.build()
		.map_err(io::Error::other)?;

	let endpoints = ProcessorEndpoints::new(
		config.default_payment_processor_url.as_str(),
		config.fallback_payment_processor_url.as_str(),
	);

	let health_store =
		RedisHealthStore::new(connection.clone(), config.store_timeout());
	let payment_repo = RedisPaymentRepository::new(connection.clone());
	let ingress_queue =
		PaymentQueue::connect(&redis_client, config.queue_pop_timeout_secs)
			.await
			.map_err(io::Error::other)?;

	let instance_id = Uuid::new_v4().to_string();
	info!("Starting health check worker as instance {instance_id}...");
	tokio::spawn(health_check_worker(
		HealthCheckUseCase::new(
			health_store.clone(),
			http_client.clone(),
			endpoints.clone(),
		),
		health_store.clone(),
		instance_id,
		HealthCheckSettings {
			interval:        config.health_check_interval(),
			offset:          config.health_check_offset(),
			coordinator_ttl: config.coordinator_ttl(),
			standby_retry:   config.coordinator_retry(),
		},
	));

	info!("Starting {} payment processing workers...", config.num_workers);
	let process_payment_use_case = ProcessPaymentUseCase::new(
		payment_repo.clone(),
		health_store.clone(),
		http_client.clone(),
		endpoints.clone(),
	);
	spawn_payment_workers(config.num_workers, |worker_id| {
		let redis_client = redis_client.clone();
		let health_store = health_store.clone();
		let process_payment_use_case = process_payment_use_case.clone();
		let pop_timeout = config.queue_pop_timeout_secs;
		async move {
			match PaymentQueue::connect(&redis_client, pop_timeout).await {
				Ok(queue) => Some(PaymentWorker::new(
					queue,
					health_store,
					process_payment_use_case,
					RoutingPolicy::default(),
					RandomBypass::new(),
				)),
				Err(e) => {
					error!("Worker {worker_id} could not connect to Redis: {e}");
					None
				}
			}
		}
	})
	.await;

	let create_payment_use_case = CreatePaymentUseCase::new(ingress_queue);
	let get_payment_summary_use_case =
		GetPaymentSummaryUseCase::new(payment_repo.clone());
	let purge_payments_use_case = PurgePaymentsUseCase::new(payment_repo);

	info!("Starting Actix-Web server on 0.0.0.0:{}...", config.server_port);
	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case.clone()))
			.app_data(web::Data::new(purge_payments_use_case.clone()))
			.configure(routes::configure::<PaymentQueue, RedisPaymentRepository>)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.server_port))?
	.run()
	.await
}
