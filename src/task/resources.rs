//! Hardware Resource Management
//!
//! Assigns the RP2350 peripherals used by the radar.
//!
//! # Resource Groups
//! - Radar servo: PIO0 state machine 0 driving the servo signal pin
//! - Range sensor: I2C0 with the VL53L0X
//! - Control button: active-high push button

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, PIO0};
use embassy_rp::pio::InterruptHandler as PioInterruptHandler;
use embassy_rp::Peri;

assign_resources! {
    /// Servo turning the sensor mount
    radar_servo: RadarServoResources {
        pin: PIN_26,
        pio: PIO0,
    },
    /// VL53L0X time-of-flight sensor
    range_sensor: RangeSensorResources {
        i2c: I2C0,
        scl: PIN_13,
        sda: PIN_12,
    },
    /// Power / scan push button
    control_button: ControlButtonResources {
        button: PIN_15,
    },
}

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});
