//! # Typed event payloads.
//!
//! [`Payload`] is a closed sum over the payload shapes the surrounding
//! device pipeline exchanges (hostname strings, MQTT messages, pin
//! commands, broker connection data, error codes). Collaborator-defined
//! data enters through the [`Payload::Opaque`] variant, which boxes any
//! `Send` value behind [`OpaquePayload`].
//!
//! Releasing a payload is just dropping it. Because payloads are owned
//! values that move with their [`Event`](crate::Event), "release runs
//! exactly once" is enforced by the compiler instead of by handler
//! discipline.

use std::any::Any;
use std::fmt;

use crate::flows::ResultPack;

/// Owned event payload.
pub enum Payload {
    /// Resolved hostname, e.g. an mDNS lookup result.
    Hostname(String),
    /// Inbound or outbound MQTT message.
    MqttMessage {
        /// MQTT topic string (distinct from bus [`Topic`](crate::Topic) ids).
        topic: String,
        /// Message body.
        body: String,
    },
    /// GPIO pin command decoded from a device message.
    PinCommand {
        /// Pin number.
        pin: u8,
        /// Target level.
        level: bool,
    },
    /// Broker connection parameters.
    Connection {
        /// Broker host.
        host: String,
        /// Broker port.
        port: u16,
    },
    /// Numeric error description.
    ErrorCode(i32),
    /// Collaborator-defined payload, type-erased.
    Opaque(OpaquePayload),
    /// Internal continuation routing pack. Only the flow layer constructs
    /// this; it never appears on user topics.
    AsyncResult(ResultPack),
}

impl Payload {
    /// Boxes an arbitrary `Send` value as an opaque payload.
    pub fn opaque<T: Any + Send>(value: T) -> Self {
        Payload::Opaque(OpaquePayload::new(value))
    }

    /// The hostname, if this is a [`Payload::Hostname`].
    pub fn as_hostname(&self) -> Option<&str> {
        match self {
            Payload::Hostname(h) => Some(h),
            _ => None,
        }
    }

    /// The error code, if this is a [`Payload::ErrorCode`].
    pub fn as_error_code(&self) -> Option<i32> {
        match self {
            Payload::ErrorCode(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Hostname(h) => f.debug_tuple("Hostname").field(h).finish(),
            Payload::MqttMessage { topic, body } => f
                .debug_struct("MqttMessage")
                .field("topic", topic)
                .field("body", body)
                .finish(),
            Payload::PinCommand { pin, level } => f
                .debug_struct("PinCommand")
                .field("pin", pin)
                .field("level", level)
                .finish(),
            Payload::Connection { host, port } => f
                .debug_struct("Connection")
                .field("host", host)
                .field("port", port)
                .finish(),
            Payload::ErrorCode(c) => f.debug_tuple("ErrorCode").field(c).finish(),
            Payload::Opaque(_) => f.write_str("Opaque(..)"),
            Payload::AsyncResult(_) => f.write_str("AsyncResult(..)"),
        }
    }
}

/// Type-erased owning payload: the boundary to collaborator-defined data.
pub struct OpaquePayload {
    inner: Box<dyn Any + Send>,
}

impl OpaquePayload {
    /// Wraps a value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    /// Borrows the inner value as `T`, if it has that type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Takes the inner value as `T`, or gives the payload back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, OpaquePayload> {
        match self.inner.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(inner) => Err(OpaquePayload { inner }),
        }
    }
}
