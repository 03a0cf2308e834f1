use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError, Received};
use crate::infrastructure::config::redis::PAYMENTS_QUEUE_KEY;

impl From<RedisError> for QueueError {
	fn from(e: RedisError) -> Self {
		QueueError::Unavailable(e.to_string())
	}
}

impl From<serde_json::Error> for QueueError {
	fn from(e: serde_json::Error) -> Self {
		QueueError::Malformed(e.to_string())
	}
}

/// Redis list used as a FIFO: `LPUSH` at the tail, `BRPOP` from the head.
///
/// A blocking pop holds its connection until it returns, so every consumer
/// should own a queue built with [`PaymentQueue::connect`] instead of sharing
/// one.
#[derive(Clone)]
pub struct PaymentQueue {
	connection:  ConnectionManager,
	pop_timeout: f64,
}

impl PaymentQueue {
	pub fn new(connection: ConnectionManager, pop_timeout: f64) -> Self {
		Self {
			connection,
			pop_timeout,
		}
	}

	pub async fn connect(
		client: &Client,
		pop_timeout: f64,
	) -> Result<Self, RedisError> {
		let connection = ConnectionManager::new(client.clone()).await?;
		Ok(Self::new(connection, pop_timeout))
	}
}

#[async_trait]
impl Queue<Payment> for PaymentQueue {
	async fn pop(&self) -> Result<Option<Received<Payment>>, QueueError> {
		let mut con = self.connection.clone();

		let popped_value: Option<(String, String)> =
			con.brpop(PAYMENTS_QUEUE_KEY, self.pop_timeout).await?;

		let Some((_queue_name, raw)) = popped_value else {
			return Ok(None);
		};

		let message: Message<Payment> = serde_json::from_str(&raw)?;

		Ok(Some(Received { message, raw }))
	}

	async fn push(&self, message: Message<Payment>) -> Result<(), QueueError> {
		self.push_raw(serde_json::to_string(&message)?).await
	}

	async fn push_raw(&self, raw: String) -> Result<(), QueueError> {
		let mut con = self.connection.clone();

		let _: () = con.lpush(PAYMENTS_QUEUE_KEY, raw).await?;
		Ok(())
	}
}
