//! Uplink
//!
//! Drains the outbound queue. The network transport is not part of this
//! firmware; this task marks the link as up and forwards every message to the
//! defmt log so a host can pick it up over RTT. Telemetry slots handed out by
//! the radar loop are logged as link heartbeats.

use defmt::info;
use embassy_futures::select::{select, Either};
use radar_sweep::system::event;

/// Outbound message sink
#[embassy_executor::task]
pub async fn uplink() {
    event::set_link_up(true);
    info!("uplink started");
    loop {
        match select(event::wait_outbound(), event::wait_telemetry_due()).await {
            Either::First(message) => {
                info!("[{}] {}", message.topic.as_str(), message.payload.as_str());
            }
            Either::Second(()) => info!("telemetry slot, link up: {}", event::link_up()),
        }
    }
}
