//! Outbound publishing
//!
//! The radar emits status strings, buffer flushes, single manual samples and scan
//! reports. Transport is somebody else's problem: every publish checks
//! connectivity first and is dropped silently when the link is down.

use heapless::String;

use crate::system::buffer::JSON_CAPACITY;
use crate::system::event::{self, OutboundMessage};

/// Largest outbound payload (a full scan report)
pub const PAYLOAD_CAPACITY: usize = 1024;

const _: () = assert!(JSON_CAPACITY <= PAYLOAD_CAPACITY);

/// Outbound payload text
pub type Payload = String<PAYLOAD_CAPACITY>;

/// Outbound message destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topic {
    /// `ONLINE` / `STANDBY`
    Status,
    /// Half-sweep buffer as JSON
    Buffer,
    /// Single `angle,distance` sample after a manual `SET`
    Data,
    /// Full scan report
    Report,
}

impl Topic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Topic::Status => "radar/status",
            Topic::Buffer => "radar/buffer",
            Topic::Data => "radar/data",
            Topic::Report => "radar/report",
        }
    }
}

/// Radar status published on mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Online,
    Standby,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Online => "ONLINE",
            Status::Standby => "STANDBY",
        }
    }
}

/// Messaging channel used by the radar
pub trait Publisher {
    /// Whether the transport is currently up
    fn is_connected(&self) -> bool;

    /// Hands a payload to the transport, fire-and-forget
    fn publish(&mut self, topic: Topic, payload: &str);

    /// Publishes only when connected, returns whether the payload was handed over
    fn try_publish(&mut self, topic: Topic, payload: &str) -> bool {
        if !self.is_connected() {
            log_debug!("link down, dropping {} message", topic.as_str());
            return false;
        }
        self.publish(topic, payload);
        true
    }
}

/// Publisher queueing onto the outbound channel drained by the uplink task
#[derive(Debug, Default, Clone, Copy)]
pub struct ChannelPublisher;

impl Publisher for ChannelPublisher {
    fn is_connected(&self) -> bool {
        event::link_up()
    }

    fn publish(&mut self, topic: Topic, payload: &str) {
        let mut message = OutboundMessage {
            topic,
            payload: Payload::new(),
        };
        if message.payload.push_str(payload).is_err() {
            log_warn!("{} payload too large ({} bytes), dropped", topic.as_str(), payload.len());
            return;
        }
        if !event::try_send_outbound(message) {
            log_warn!("outbound queue full, dropped {} message", topic.as_str());
        }
    }
}
