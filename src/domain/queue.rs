use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Message<B> {
	pub id:   Uuid,
	pub body: B,
}

impl<B> Message<B> {
	pub fn with(id: Uuid, body: B) -> Message<B> {
		Message { id, body }
	}

	/// Wraps `body` under a freshly generated message id.
	pub fn new(body: B) -> Message<B> {
		Message::with(Uuid::new_v4(), body)
	}
}

/// A popped message together with the exact payload it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Received<B> {
	pub message: Message<B>,
	pub raw:     String,
}

#[derive(Debug, Display, Error)]
pub enum QueueError {
	#[display("queue is unavailable: {_0}")]
	Unavailable(#[error(not(source))] String),
	#[display("malformed queue message: {_0}")]
	Malformed(#[error(not(source))] String),
}

/// FIFO of pending work. `push` appends to the tail, `pop` takes from the head
/// and waits up to an implementation-defined timeout, yielding `None` when
/// nothing arrived in time.
#[async_trait]
pub trait Queue<B>: Send + Sync + 'static {
	async fn pop(&self) -> Result<Option<Received<B>>, QueueError>;

	async fn push(&self, message: Message<B>) -> Result<(), QueueError>;

	/// Appends a payload exactly as it was popped, without re-encoding it.
	async fn push_raw(&self, raw: String) -> Result<(), QueueError>;
}
