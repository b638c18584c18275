//! # Worker contract and continuation carriers.
//!
//! A worker is a blocking function run on a dedicated task. It reports
//! success or failure and may hand back a payload either way — a resolved
//! hostname on success, an error description on failure. The bus never
//! inspects the payload; it only routes it to the matching branch.
//!
//! [`ResultPack`] is the transient payload posted on the reserved
//! [`ASYNC_RESULT`](crate::ASYNC_RESULT) topic: the worker's output plus
//! the continuation context the router needs to resume the flow. It is
//! constructed and consumed inside this crate; user code only ever sees it
//! as the opaque `Payload::AsyncResult` variant.

use crate::events::{Payload, Topic};

use super::flow::Flow;

/// Outcome of one worker run.
pub enum WorkerResult {
    /// Worker succeeded; the payload (if any) becomes the shadow event's
    /// payload on the ok-branch.
    Success(Option<Payload>),
    /// Worker failed; the payload (often `None`, sometimes an error
    /// description) rides the err-branch the same way.
    Failure(Option<Payload>),
}

impl WorkerResult {
    /// True for [`WorkerResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, WorkerResult::Success(_))
    }

    pub(crate) fn into_parts(self) -> (bool, Option<Payload>) {
        match self {
            WorkerResult::Success(p) => (true, p),
            WorkerResult::Failure(p) => (false, p),
        }
    }
}

/// Continuation state for one async flow invocation: the two branch flows
/// and the shadow seed (topic and scalar of the original trigger). The
/// shadow's payload is by definition the worker's output, so the trigger's
/// payload is never stored here.
pub(crate) struct AsyncContext {
    pub(crate) on_ok: Flow,
    pub(crate) on_err: Flow,
    pub(crate) topic: Topic,
    pub(crate) scalar: i32,
}

/// Worker output plus continuation context, carried through the bus as
/// `Payload::AsyncResult` and consumed by the graph router.
pub struct ResultPack {
    pub(crate) output: Option<Box<Payload>>,
    pub(crate) ctx: AsyncContext,
}
