pub const PAYMENTS_QUEUE_KEY: &str = "payments_queue";
pub const HEALTH_KEY_PREFIX: &str = "health";
pub const COORDINATOR_KEY: &str = "health:coordinator";
pub const PAYMENT_KEY_PREFIX: &str = "payment";
pub const PROCESSED_PAYMENTS_KEY_PREFIX: &str = "payments";

pub fn health_key_of(processor: &str) -> String {
	format!("{HEALTH_KEY_PREFIX}:{processor}")
}

pub fn payment_key_of(correlation_id: &str) -> String {
	format!("{PAYMENT_KEY_PREFIX}:{correlation_id}")
}

pub fn processed_payments_key_of(processor: &str) -> String {
	format!("{PROCESSED_PAYMENTS_KEY_PREFIX}:{processor}")
}
