//! Radar firmware entry point
//!
//! Initializes the RP2350 and spawns the radar, control button and uplink tasks.

#![no_std]
#![no_main]

use crate::task::{control_button::control_button, radar::radar, uplink::uplink};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use task::resources::{AssignedResources, ControlButtonResources, RadarServoResources, RangeSensorResources};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    // Uplink first so the link is up before the radar publishes anything
    spawner.spawn(uplink()).unwrap();
    spawner.spawn(radar(r.radar_servo, r.range_sensor)).unwrap();
    spawner.spawn(control_button(r.control_button)).unwrap();
}
