#![cfg_attr(not(test), no_std)]

//! Radar sweep control
//!
//! Drives a servo mounted time-of-flight sensor through a continuous patrol sweep,
//! buffers distance samples per half-sweep and runs an on-demand blocking full scan
//! that leaves the patrol sweep exactly where it was.
//!
//! The [`system`] modules hold the hardware independent core. The firmware binary
//! (feature `rp2350`) wires them to the RP2350 peripherals.

/// Logging macros shared by the core and the firmware
#[macro_use]
pub mod logging;

/// Sweep core: state machine, scan report, commands and plumbing
pub mod system;
