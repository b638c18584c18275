//! # Flow combinators.
//!
//! A [`Flow`] is a shared callable over `(&Event, &Bus)`: it inspects the
//! triggering event and may publish further events. Combinators build new
//! flows out of existing ones; [`FlowGraph::when`](super::FlowGraph::when)
//! installs the finished flow as a bus subscription.
//!
//! The algebra is deliberately small:
//!
//! | Combinator | Behavior |
//! |---|---|
//! | [`publish`] | emit a synthetic event, forwarding the trigger's payload |
//! | [`publish_with`] | emit a synthetic event with a freshly built payload |
//! | [`seq`] | run two flows left to right on the same trigger |
//! | [`tee`] | alias of [`seq`], signalling side-effect fan-out |
//! | [`filter`] | gate a flow on a predicate |
//! | [`branch`] | choose one of two flows on a predicate |
//! | [`tap`] | observe the trigger; never publishes |

use std::sync::Arc;

use crate::bus::Bus;
use crate::events::{Event, Payload, Topic};

/// A composable flow step. Invoked with the triggering event (borrowed for
/// the call) and the bus to publish on.
pub type Flow = Arc<dyn Fn(&Event, &Bus) + Send + Sync>;

/// Emits `Event { topic, scalar }` whenever the flow fires.
///
/// If the triggering event still owns a payload, the payload is claimed
/// and carried into the synthetic event — this is how data crosses a
/// `when(...)` hop (an mDNS hostname riding from the lookup result into
/// the connect step). The trigger's topic and scalar are ignored.
pub fn publish(topic: Topic, scalar: i32) -> Flow {
    Arc::new(move |trigger, bus| {
        let mut ev = Event::new(topic, scalar);
        if let Some(p) = trigger.take_payload() {
            ev = ev.with_payload(p);
        }
        bus.publish(ev);
    })
}

/// Emits `Event { topic, scalar }` with a payload built per firing.
///
/// Unlike [`publish`], the trigger's payload is left untouched.
pub fn publish_with<F>(topic: Topic, scalar: i32, factory: F) -> Flow
where
    F: Fn() -> Payload + Send + Sync + 'static,
{
    Arc::new(move |_, bus| {
        bus.publish(Event::new(topic, scalar).with_payload(factory()));
    })
}

/// Runs `a`, then `b`, with the same triggering event.
pub fn seq(a: Flow, b: Flow) -> Flow {
    Arc::new(move |e, bus| {
        a(e, bus);
        b(e, bus);
    })
}

/// Alias of [`seq`]: both sides are side effects, neither feeds the other.
pub fn tee(a: Flow, b: Flow) -> Flow {
    seq(a, b)
}

/// Runs `then` iff `pred` holds for the trigger.
pub fn filter<P>(pred: P, then: Flow) -> Flow
where
    P: Fn(&Event) -> bool + Send + Sync + 'static,
{
    Arc::new(move |e, bus| {
        if pred(e) {
            then(e, bus);
        }
    })
}

/// Evaluates `pred` exactly once and runs the matching side.
pub fn branch<P>(pred: P, on_true: Flow, on_false: Flow) -> Flow
where
    P: Fn(&Event) -> bool + Send + Sync + 'static,
{
    Arc::new(move |e, bus| {
        if pred(e) {
            on_true(e, bus);
        } else {
            on_false(e, bus);
        }
    })
}

/// Calls `f` for its side effect. Never publishes.
pub fn tap<F>(f: F) -> Flow
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    Arc::new(move |e, _| f(e))
}
