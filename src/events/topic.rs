//! # Topics and delivery masks.
//!
//! A topic is a small integer channel id. Topics `0..32` are "fast": a
//! subscription can pre-filter them with a 32-bit [`TopicMask`] before any
//! handler code runs. Higher topic values are allowed for low-frequency
//! channels; they bypass the mask and are gated by [`MASK_ALL`] opt-in or a
//! subscription predicate (see [`Bus::subscribe_filtered`]).
//!
//! One value is owned by the crate itself: [`ASYNC_RESULT`] routes async
//! continuation results back to their [`FlowGraph`]. User code must never
//! publish on it.
//!
//! [`Bus::subscribe_filtered`]: crate::Bus::subscribe_filtered
//! [`FlowGraph`]: crate::FlowGraph

/// Event channel identifier.
pub type Topic = u16;

/// 32-bit subscription bitmap over the fast topics `0..32`.
pub type TopicMask = u32;

/// Number of topics covered by the fast bitmask.
pub const FAST_TOPICS: Topic = 32;

/// Mask matching every fast topic, and the opt-in for topics `>= 32`.
pub const MASK_ALL: TopicMask = 0xFFFF_FFFF;

/// Reserved internal topic carrying async continuation results.
///
/// Kept inside the fast-mask range so the router can mask-filter it.
/// Publishing on this topic from user code is a contract violation: the
/// router will try to claim a continuation pack that is not there.
pub const ASYNC_RESULT: Topic = 31;

/// Mask bit for a single topic; zero for topics outside the fast range.
pub const fn bit(topic: Topic) -> TopicMask {
    if topic < FAST_TOPICS {
        1u32 << topic
    } else {
        0
    }
}
