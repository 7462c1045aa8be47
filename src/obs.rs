//! Optional observability helpers for session flows and request hooks.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `bearer_keeper.flow` with the `flow` and `stage`
//!   fields, plus `debug` events for every hook decision. Tokens appear only as
//!   fingerprints.
//! - Enable `metrics` to increment `bearer_keeper_flow_total` (labeled by `flow` + `outcome`)
//!   and `bearer_keeper_hook_total` (labeled by `hook` + `outcome`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, auth::Token};

/// Session flows observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Account registration.
	Register,
	/// Credential login.
	Login,
	/// Local logout.
	Logout,
	/// Arbitrary request routed through the hooks.
	Request,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Register => "register",
			FlowKind::Login => "login",
			FlowKind::Logout => "logout",
			FlowKind::Request => "request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each flow attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Which side of the pipeline a hook runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
	/// Pre-send hook.
	Request,
	/// Post-receive hook.
	Response,
}
impl HookKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HookKind::Request => "request",
			HookKind::Response => "response",
		}
	}
}
impl Display for HookKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What a hook invocation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookOutcome {
	/// The bearer header was attached.
	Attached,
	/// A renewed token was saved.
	Renewed,
	/// Nothing applied (foreign origin, no token, no renewal).
	Skipped,
	/// Storage or header encoding failed.
	Failed,
}
impl HookOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HookOutcome::Attached => "attached",
			HookOutcome::Renewed => "renewed",
			HookOutcome::Skipped => "skipped",
			HookOutcome::Failed => "failed",
		}
	}
}
impl Display for HookOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a hook decision as a metric and, with `tracing`, a `debug` event.
pub fn record_hook(kind: HookKind, outcome: HookOutcome, target: &str, token: Option<&Token>) {
	record_hook_outcome(kind, outcome);
	trace_hook(kind, outcome, target, token.map(Token::fingerprint).as_deref());
}
