use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorType {
	#[display("default")]
	Default,
	#[display("fallback")]
	Fallback,
}

impl ProcessorType {
	pub const ALL: [ProcessorType; 2] =
		[ProcessorType::Default, ProcessorType::Fallback];

	pub fn as_str(&self) -> &'static str {
		match self {
			ProcessorType::Default => "default",
			ProcessorType::Fallback => "fallback",
		}
	}

	/// Per-transaction fee charged by the processor, used to weigh latency.
	pub fn surcharge_rate(&self) -> f64 {
		match self {
			ProcessorType::Default => 0.05,
			ProcessorType::Fallback => 0.15,
		}
	}

	pub fn other(&self) -> ProcessorType {
		match self {
			ProcessorType::Default => ProcessorType::Fallback,
			ProcessorType::Fallback => ProcessorType::Default,
		}
	}
}

/// Last known health of a processor, as reported by its health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStatus {
	pub failing:           bool,
	#[serde(rename = "minResponseTime")]
	pub min_response_time: u64,
}

#[derive(Debug, Clone)]
pub struct ProcessorEndpoints {
	default:  String,
	fallback: String,
}

impl ProcessorEndpoints {
	pub fn new(default: impl Into<String>, fallback: impl Into<String>) -> Self {
		Self {
			default:  default.into().trim_end_matches('/').to_string(),
			fallback: fallback.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn url_of(&self, processor: ProcessorType) -> &str {
		match processor {
			ProcessorType::Default => &self.default,
			ProcessorType::Fallback => &self.fallback,
		}
	}
}
