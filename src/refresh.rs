//! Single-flight coordination for credential refreshes.
//!
//! Concurrent requests that each hit a 401 during the same credential expiry must not stampede
//! the refresh endpoint. [`RefreshCoordinator::coordinate`] admits exactly one caller to run
//! the refresh while every other caller parks on the same gate and then adopts the settled
//! outcome instead of issuing its own refresh. Settlement always opens a new cycle, so a 401
//! arriving after the dust settles triggers a fresh refresh rather than replaying a stale
//! verdict.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::_prelude::*;

/// Shared verdict of a settled refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// The credential was renewed and persisted; retry the original request once.
	Renewed,
	/// The refresh was rejected; the session is unrecoverable.
	Rejected,
}

#[derive(Debug, Default)]
struct CoordinatorState {
	epoch: u64,
	settled: Option<Settlement>,
}

#[derive(Clone, Copy, Debug)]
struct Settlement {
	outcome: RefreshOutcome,
}

/// Process-wide single-flight guard around the refresh endpoint.
///
/// One coordinator lives inside each [`ApiClient`](crate::client::ApiClient); clones of the
/// client share it, which is what makes the single-flight invariant hold across concurrent
/// requests.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
	gate: AsyncMutex<()>,
	state: Mutex<CoordinatorState>,
}
impl RefreshCoordinator {
	/// Runs `refresh` under the single-flight guard, or adopts an interim settlement.
	///
	/// The caller snapshots the current cycle, then awaits the admission gate. If another
	/// caller settled a refresh while this one waited, that settlement's outcome is adopted
	/// without touching the refresh endpoint. Otherwise this caller performs the refresh and
	/// records the verdict for everyone still parked on the gate.
	pub async fn coordinate<F, Fut>(&self, refresh: F) -> RefreshOutcome
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<()>>,
	{
		let observed = self.state.lock().epoch;
		let _gate = self.gate.lock().await;

		if let Some(outcome) = self.interim_settlement(observed) {
			return outcome;
		}

		let outcome = match refresh().await {
			Ok(()) => RefreshOutcome::Renewed,
			Err(_) => RefreshOutcome::Rejected,
		};
		let mut state = self.state.lock();

		state.epoch += 1;
		state.settled = Some(Settlement { outcome });

		outcome
	}

	/// Returns the outcome of a refresh that settled while the caller awaited the gate.
	fn interim_settlement(&self, observed: u64) -> Option<RefreshOutcome> {
		let state = self.state.lock();

		if state.epoch == observed {
			return None;
		}

		state.settled.as_ref().map(|settlement| settlement.outcome)
	}
}
