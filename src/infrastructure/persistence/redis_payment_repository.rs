use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{RedisError, Script};
use time::OffsetDateTime;

use crate::domain::payment::PersistedPayment;
use crate::domain::processor::ProcessorType;
use crate::domain::repository::{
	PaymentRepository, PaymentSummary, RepositoryError,
};
use crate::infrastructure::config::redis::{
	PAYMENT_KEY_PREFIX, payment_key_of, processed_payments_key_of,
};

const AMOUNTS_IN_RANGE_LUA: &str = r#"
local ids = redis.call("ZRANGEBYSCORE", KEYS[1], ARGV[1], ARGV[2])
local amounts = {}

for _, id in ipairs(ids) do
    local amount = redis.call("HGET", ARGV[3] .. ":" .. id, "amount")
    if amount then
        table.insert(amounts, amount)
    end
end

return amounts
"#;

const PURGE_LUA: &str = r#"
for _, index in ipairs(KEYS) do
    local ids = redis.call("ZRANGE", index, 0, -1)
    for _, id in ipairs(ids) do
        redis.call("DEL", ARGV[1] .. ":" .. id)
    end
    redis.call("DEL", index)
end
return 1
"#;

impl From<RedisError> for RepositoryError {
	fn from(e: RedisError) -> Self {
		RepositoryError::Unavailable(e.to_string())
	}
}

#[derive(Clone)]
pub struct RedisPaymentRepository {
	connection: ConnectionManager,
}

impl RedisPaymentRepository {
	pub fn new(connection: ConnectionManager) -> Self {
		Self { connection }
	}
}

fn unix_millis(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}

#[async_trait]
impl PaymentRepository for RedisPaymentRepository {
	async fn save(&self, payment: PersistedPayment) -> Result<(), RepositoryError> {
		let mut con = self.connection.clone();

		let payment_id = payment.correlation_id.as_str();
		let processed_at = unix_millis(payment.processed_at);

		redis::pipe()
			.atomic()
			.hset_multiple(payment_key_of(payment_id), &[
				("amount", payment.amount.to_string()),
				("processed_at", processed_at.to_string()),
				("processed_by", payment.processed_by.to_string()),
			])
			.ignore()
			.zadd(
				processed_payments_key_of(payment.processed_by.as_str()),
				payment_id,
				processed_at,
			)
			.ignore()
			.query_async::<()>(&mut con)
			.await?;

		Ok(())
	}

	async fn summary_of(
		&self,
		processor: ProcessorType,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<PaymentSummary, RepositoryError> {
		let mut con = self.connection.clone();

		let min = from
			.map(|at| unix_millis(at).to_string())
			.unwrap_or_else(|| "-inf".to_string());
		let max = to
			.map(|at| format!("({}", unix_millis(at)))
			.unwrap_or_else(|| "+inf".to_string());

		let amounts: Vec<String> = Script::new(AMOUNTS_IN_RANGE_LUA)
			.key(processed_payments_key_of(processor.as_str()))
			.arg(min)
			.arg(max)
			.arg(PAYMENT_KEY_PREFIX)
			.invoke_async(&mut con)
			.await?;

		Ok(amounts
			.iter()
			.filter_map(|amount| amount.parse::<f64>().ok())
			.fold(PaymentSummary::default(), |summary, amount| PaymentSummary {
				total_requests: summary.total_requests + 1,
				total_amount:   summary.total_amount + amount,
			}))
	}

	async fn purge(&self) -> Result<(), RepositoryError> {
		let mut con = self.connection.clone();

		let script = Script::new(PURGE_LUA);
		let mut invocation = script.prepare_invoke();
		for processor in ProcessorType::ALL {
			invocation.key(processed_payments_key_of(processor.as_str()));
		}

		let _: i64 = invocation
			.arg(PAYMENT_KEY_PREFIX)
			.invoke_async(&mut con)
			.await?;

		Ok(())
	}
}
