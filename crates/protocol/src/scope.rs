//! Task-scoped carrier for [`CallContext`].
//!
//! The active context lives in a `tokio::task_local!` cell, so it follows
//! the call's own execution across await points and never leaks between
//! concurrent tasks. A process-wide flag would do exactly that leaking,
//! which is the one failure mode this module exists to rule out.

use crate::context::CallContext;
use std::future::Future;

tokio::task_local! {
    static ACTIVE_CONTEXT: CallContext;
}

/// Runs `fut` with `ctx` as the active call context.
///
/// Every call inside `fut`, including after suspension points, observes
/// `ctx` via [`current_context`]. Scopes nest: an inner `scope` shadows the
/// outer one for its own extent only.
pub async fn scope<F>(ctx: CallContext, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_CONTEXT.scope(ctx, fut).await
}

/// The active context, or `None` when no scope was entered on this task.
pub fn try_current_context() -> Option<CallContext> {
    ACTIVE_CONTEXT.try_with(CallContext::clone).ok()
}

/// The active context, defaulting to [`CallContext::internal`].
///
/// Code paths invoked outside any boundary must not fail for lack of
/// tagging; they proceed as internal traffic.
pub fn current_context() -> CallContext {
    try_current_context().unwrap_or_else(CallContext::internal)
}
