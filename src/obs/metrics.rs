// self
use crate::obs::{FlowKind, FlowOutcome, HookKind, HookOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bearer_keeper_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a hook outcome via the global metrics recorder (when enabled).
pub fn record_hook_outcome(kind: HookKind, outcome: HookOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bearer_keeper_hook_total",
			"hook" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
