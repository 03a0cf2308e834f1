use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::processor::{ProcessorStatus, ProcessorType};

/// Source of the "probe it anyway" coin flips used when both processors are
/// believed to be down.
pub trait BypassSource: Send {
	/// Returns `true` with probability `1 / one_in`.
	fn draw(&mut self, one_in: u32) -> bool;
}

pub struct RandomBypass {
	rng: StdRng,
}

impl RandomBypass {
	pub fn new() -> Self {
		Self {
			rng: StdRng::from_entropy(),
		}
	}

	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
		}
	}
}

impl Default for RandomBypass {
	fn default() -> Self {
		Self::new()
	}
}

impl BypassSource for RandomBypass {
	fn draw(&mut self, one_in: u32) -> bool {
		one_in > 0 && self.rng.gen_ratio(1, one_in)
	}
}

/// Decides, per payment, which processors to attempt and in which order.
///
/// The cached health is never fully trusted: a processor flagged as failing
/// is still tried as a last resort when the other one is healthy, and when
/// both are flagged a random draw occasionally probes them anyway so that a
/// recovery is noticed before the next health poll.
#[derive(Debug, Clone, Copy)]
pub struct RoutingPolicy {
	pub default_bypass_one_in:  u32,
	pub fallback_bypass_one_in: u32,
}

impl Default for RoutingPolicy {
	fn default() -> Self {
		Self {
			default_bypass_one_in:  4,
			fallback_bypass_one_in: 8,
		}
	}
}

impl RoutingPolicy {
	pub fn route<B>(
		&self,
		default: &ProcessorStatus,
		fallback: &ProcessorStatus,
		bypass: &mut B,
	) -> Vec<ProcessorType>
	where
		B: BypassSource + ?Sized,
	{
		match (default.failing, fallback.failing) {
			(false, false) => {
				let preferred = Self::cheapest(default, fallback);
				vec![preferred, preferred.other()]
			}
			(false, true) => vec![ProcessorType::Default, ProcessorType::Fallback],
			(true, false) => vec![ProcessorType::Fallback, ProcessorType::Default],
			(true, true) => {
				if bypass.draw(self.default_bypass_one_in) {
					vec![ProcessorType::Default, ProcessorType::Fallback]
				} else if bypass.draw(self.fallback_bypass_one_in) {
					vec![ProcessorType::Fallback]
				} else {
					Vec::new()
				}
			}
		}
	}

	/// Fallback wins only when its latency advantage outweighs its higher fee.
	fn cheapest(
		default: &ProcessorStatus,
		fallback: &ProcessorStatus,
	) -> ProcessorType {
		let default_cost = cost_of(ProcessorType::Default, default);
		let fallback_cost = cost_of(ProcessorType::Fallback, fallback);

		if fallback_cost < default_cost {
			ProcessorType::Fallback
		} else {
			ProcessorType::Default
		}
	}
}

pub fn cost_of(processor: ProcessorType, status: &ProcessorStatus) -> f64 {
	status.min_response_time as f64 * (1.0 + processor.surcharge_rate())
}
