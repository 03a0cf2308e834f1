use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use payment_router::domain::health_store::{HealthStore, HealthStoreError};
use payment_router::domain::payment::{Payment, PersistedPayment};
use payment_router::domain::processor::{ProcessorStatus, ProcessorType};
use payment_router::domain::queue::{Message, Queue, QueueError, Received};
use payment_router::domain::repository::{
	PaymentRepository, PaymentSummary, RepositoryError,
};
use payment_router::domain::routing::BypassSource;
use time::OffsetDateTime;

/// Keeps serialized messages, so tests can also plant undecodable ones.
#[derive(Clone, Default)]
pub struct InMemoryQueue {
	messages:    Arc<Mutex<VecDeque<String>>>,
	unavailable: Arc<Mutex<bool>>,
}

impl InMemoryQueue {
	pub fn len(&self) -> usize {
		self.messages.lock().unwrap().len()
	}

	pub fn snapshot(&self) -> Vec<Message<Payment>> {
		self.messages
			.lock()
			.unwrap()
			.iter()
			.map(|raw| serde_json::from_str(raw).unwrap())
			.collect()
	}

	pub fn raw_snapshot(&self) -> Vec<String> {
		self.messages.lock().unwrap().iter().cloned().collect()
	}

	pub fn set_unavailable(&self, unavailable: bool) {
		*self.unavailable.lock().unwrap() = unavailable;
	}
}

#[async_trait]
impl Queue<Payment> for InMemoryQueue {
	async fn pop(&self) -> Result<Option<Received<Payment>>, QueueError> {
		if *self.unavailable.lock().unwrap() {
			return Err(QueueError::Unavailable("connection refused".into()));
		}
		let Some(raw) = self.messages.lock().unwrap().pop_front() else {
			return Ok(None);
		};
		let message = serde_json::from_str(&raw)
			.map_err(|e| QueueError::Malformed(e.to_string()))?;
		Ok(Some(Received { message, raw }))
	}

	async fn push(&self, message: Message<Payment>) -> Result<(), QueueError> {
		let raw = serde_json::to_string(&message)
			.map_err(|e| QueueError::Malformed(e.to_string()))?;
		self.push_raw(raw).await
	}

	async fn push_raw(&self, raw: String) -> Result<(), QueueError> {
		if *self.unavailable.lock().unwrap() {
			return Err(QueueError::Unavailable("connection refused".into()));
		}
		self.messages.lock().unwrap().push_back(raw);
		Ok(())
	}
}

#[derive(Default)]
struct HealthState {
	statuses:       HashMap<ProcessorType, ProcessorStatus>,
	coordinator:    Option<(String, Instant)>,
	writes:         usize,
	rejects_writes: bool,
}

#[derive(Clone, Default)]
pub struct InMemoryHealthStore {
	state: Arc<Mutex<HealthState>>,
}

impl InMemoryHealthStore {
	pub fn with_status(
		self,
		processor: ProcessorType,
		failing: bool,
		min_response_time: u64,
	) -> Self {
		self.state.lock().unwrap().statuses.insert(
			processor,
			ProcessorStatus {
				failing,
				min_response_time,
			},
		);
		self
	}

	/// `None` until something was written for `processor`.
	pub fn stored(&self, processor: ProcessorType) -> Option<ProcessorStatus> {
		self.state.lock().unwrap().statuses.get(&processor).cloned()
	}

	/// Makes every status write fail as if the store had timed out.
	pub fn rejecting_writes(self) -> Self {
		self.state.lock().unwrap().rejects_writes = true;
		self
	}

	pub fn writes(&self) -> usize {
		self.state.lock().unwrap().writes
	}

	pub fn coordinator(&self) -> Option<String> {
		self.state
			.lock()
			.unwrap()
			.coordinator
			.as_ref()
			.filter(|(_, expires_at)| *expires_at > Instant::now())
			.map(|(owner, _)| owner.clone())
	}
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
	async fn status_of(&self, processor: ProcessorType) -> ProcessorStatus {
		self.stored(processor).unwrap_or_default()
	}

	async fn set_failing(
		&self,
		processor: ProcessorType,
		failing: bool,
	) -> Result<(), HealthStoreError> {
		let mut state = self.state.lock().unwrap();
		if state.rejects_writes {
			return Err(HealthStoreError::Timeout(Duration::from_millis(50)));
		}
		state.writes += 1;
		state.statuses.entry(processor).or_default().failing = failing;
		Ok(())
	}

	async fn set_min_response_time(
		&self,
		processor: ProcessorType,
		min_response_time: u64,
	) -> Result<(), HealthStoreError> {
		let mut state = self.state.lock().unwrap();
		if state.rejects_writes {
			return Err(HealthStoreError::Timeout(Duration::from_millis(50)));
		}
		state.writes += 1;
		state
			.statuses
			.entry(processor)
			.or_default()
			.min_response_time = min_response_time;
		Ok(())
	}

	async fn try_acquire_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError> {
		let now = Instant::now();
		let mut state = self.state.lock().unwrap();
		if matches!(&state.coordinator, Some((_, expires_at)) if *expires_at > now) {
			return Ok(false);
		}
		state.coordinator = Some((owner.to_string(), now + ttl));
		Ok(true)
	}

	async fn renew_coordinator(
		&self,
		owner: &str,
		ttl: Duration,
	) -> Result<bool, HealthStoreError> {
		let now = Instant::now();
		let mut state = self.state.lock().unwrap();
		match state.coordinator.as_mut() {
			Some((holder, expires_at)) if *holder == owner && *expires_at > now => {
				*expires_at = now + ttl;
				Ok(true)
			}
			_ => Ok(false),
		}
	}
}

#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
	payments:    Arc<Mutex<Vec<PersistedPayment>>>,
	unavailable: Arc<Mutex<bool>>,
}

impl InMemoryPaymentRepository {
	pub fn saved(&self) -> Vec<PersistedPayment> {
		self.payments.lock().unwrap().clone()
	}

	pub fn set_unavailable(&self, unavailable: bool) {
		*self.unavailable.lock().unwrap() = unavailable;
	}

	fn check_available(&self) -> Result<(), RepositoryError> {
		if *self.unavailable.lock().unwrap() {
			return Err(RepositoryError::Unavailable("connection refused".into()));
		}
		Ok(())
	}
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
	async fn save(&self, payment: PersistedPayment) -> Result<(), RepositoryError> {
		self.check_available()?;
		self.payments.lock().unwrap().push(payment);
		Ok(())
	}

	async fn summary_of(
		&self,
		processor: ProcessorType,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<PaymentSummary, RepositoryError> {
		self.check_available()?;
		let payments = self.payments.lock().unwrap();
		Ok(payments
			.iter()
			.filter(|p| p.processed_by == processor)
			.filter(|p| from.is_none_or(|from| p.processed_at >= from))
			.filter(|p| to.is_none_or(|to| p.processed_at < to))
			.fold(PaymentSummary::default(), |summary, p| PaymentSummary {
				total_requests: summary.total_requests + 1,
				total_amount:   summary.total_amount + p.amount,
			}))
	}

	async fn purge(&self) -> Result<(), RepositoryError> {
		self.check_available()?;
		self.payments.lock().unwrap().clear();
		Ok(())
	}
}

/// Answers bypass draws from a fixed script, then always `false`.
#[derive(Default)]
pub struct ScriptedBypass {
	answers: VecDeque<bool>,
	draws:   Vec<u32>,
}

impl ScriptedBypass {
	pub fn answering(answers: &[bool]) -> Self {
		Self {
			answers: answers.iter().copied().collect(),
			draws:   Vec::new(),
		}
	}

	pub fn never() -> Self {
		Self::default()
	}
}

impl BypassSource for ScriptedBypass {
	fn draw(&mut self, one_in: u32) -> bool {
		self.draws.push(one_in);
		self.answers.pop_front().unwrap_or(false)
	}
}
