//! Firmware tasks and drivers
pub mod control_button;
pub mod radar;
pub mod range_sensor;
pub mod resources;
pub mod servo;
pub mod uplink;
