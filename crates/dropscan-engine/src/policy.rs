//! Failure policy for dependency outages.
//!
//! The pipeline favors availability over strictness: when a remote
//! dependency (catalog lookup, sandbox detonation, persistence) fails,
//! scanning continues with a benign fallback verdict instead of surfacing
//! the error. A store outage must not block file intake, and the local
//! heuristic and static stages still run at full strength.

/// Verdict assumed for a stage whose remote dependency failed.
///
/// `false` means "not malicious": an unreachable sandbox never flags a
/// file on its own.
pub const VERDICT_ON_DEPENDENCY_FAILURE: bool = false;

/// The verdict to report when a remote analysis stage cannot complete.
#[must_use]
pub const fn fallback_verdict() -> bool {
    VERDICT_ON_DEPENDENCY_FAILURE
}
