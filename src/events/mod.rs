//! Event data model: topics, payloads, and the event record.
//!
//! ## Contents
//! - [`Topic`], [`TopicMask`], [`bit`], [`MASK_ALL`], [`ASYNC_RESULT`] —
//!   channel ids and fast-path filtering
//! - [`Payload`], [`OpaquePayload`] — typed payloads with a type-erased
//!   collaborator boundary
//! - [`Event`] — the move-only record delivered to listeners
//!
//! ## Ownership
//! A payload is released exactly once: by the claimant that took it with
//! [`Event::take_payload`], or by the event's own drop at the end of
//! delivery or in the queue's drop-oldest path.

mod event;
mod payload;
mod topic;

pub use event::Event;
pub use payload::{OpaquePayload, Payload};
pub use topic::{bit, Topic, TopicMask, ASYNC_RESULT, FAST_TOPICS, MASK_ALL};
