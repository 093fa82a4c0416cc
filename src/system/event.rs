//! Radar Events
//!
//! Channels and signals connecting the radar task to the rest of the firmware:
//! - inbound control messages, from the transport or the control button
//! - on-demand scan requests, from the control button
//! - outbound messages towards the transport
//! - telemetry slots handed out by the loop arbiter
//! - transport link state

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;

use crate::system::publish::{Payload, Topic};

/// Longest accepted control message
pub const CONTROL_MESSAGE_SIZE: usize = 32;

/// Inbound control message text
pub type ControlMessage = String<CONTROL_MESSAGE_SIZE>;

/// Inbound control queue
static CONTROL_CHANNEL: Channel<CriticalSectionRawMutex, ControlMessage, 4> = Channel::new();

/// Pending full scan request
static SCAN_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Outbound message queue, drained by the uplink
static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, OutboundMessage, 4> = Channel::new();

/// Telemetry readout is due
static TELEMETRY_DUE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Transport connectivity
static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Message waiting to be transmitted
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub topic: Topic,
    pub payload: Payload,
}

/// Queues a control message from the transport
///
/// Returns `false` if the message is too long or the queue is full; the message
/// is dropped in both cases.
pub fn try_send_control(message: &str) -> bool {
    let mut control = ControlMessage::new();
    if control.push_str(message.trim()).is_err() {
        return false;
    }
    CONTROL_CHANNEL.try_send(control).is_ok()
}

/// Waits for the next control message
pub async fn wait_control() -> ControlMessage {
    CONTROL_CHANNEL.receive().await
}

/// Requests a full scan report
pub fn request_scan() {
    SCAN_REQUEST.signal(());
}

/// Waits for a full scan request
pub async fn wait_scan_request() {
    SCAN_REQUEST.wait().await
}

/// Queues an outbound message without waiting
pub fn try_send_outbound(message: OutboundMessage) -> bool {
    OUTBOUND_CHANNEL.try_send(message).is_ok()
}

/// Waits for the next outbound message
pub async fn wait_outbound() -> OutboundMessage {
    OUTBOUND_CHANNEL.receive().await
}

/// Takes the next outbound message if there is one
pub fn try_receive_outbound() -> Option<OutboundMessage> {
    OUTBOUND_CHANNEL.try_receive().ok()
}

/// Signals that a telemetry readout is due
pub fn signal_telemetry_due() {
    TELEMETRY_DUE.signal(());
}

/// Waits for the next telemetry slot
///
/// Slots signaled while nobody waits collapse into one.
pub async fn wait_telemetry_due() {
    TELEMETRY_DUE.wait().await
}

/// Updates the transport link state
pub fn set_link_up(up: bool) {
    LINK_UP.store(up, Ordering::Relaxed);
}

/// Whether the transport link is up
pub fn link_up() -> bool {
    LINK_UP.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_messages_are_trimmed_and_queued() {
        assert!(try_send_control(" POWER_ON\n"));
        let message = CONTROL_CHANNEL.try_receive().unwrap();
        assert_eq!(message.as_str(), "POWER_ON");
    }

    #[test]
    fn test_oversized_control_message_is_dropped() {
        let long = "SET:0000000000000000000000000000000000090";
        assert!(!try_send_control(long));
    }

    #[test]
    fn test_telemetry_slots_collapse() {
        signal_telemetry_due();
        signal_telemetry_due();
        assert!(TELEMETRY_DUE.try_take().is_some());
        assert!(TELEMETRY_DUE.try_take().is_none());
    }

    #[test]
    fn test_scan_request_signal() {
        request_scan();
        assert!(SCAN_REQUEST.signaled());
        SCAN_REQUEST.reset();
        assert!(!SCAN_REQUEST.signaled());
    }
}
