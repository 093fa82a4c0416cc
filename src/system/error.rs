//! Radar error types
//!
//! Nothing in the radar core is fatal. Sensor faults discard the sample and
//! initialization faults leave the radar running degraded.

use thiserror::Error;

/// Range sensor read faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No measurement completed within the sensor timeout
    #[error("range measurement timed out")]
    Timeout,
    /// I2C transfer failed
    #[error("range sensor bus error")]
    Bus,
    /// No measurement available yet, or the sensor failed to initialize
    #[error("range sensor not ready")]
    NotReady,
}

/// Startup faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Servo calibration cannot cover the sweep window
    #[error("servo calibration invalid")]
    Actuator,
    /// Sensor did not respond on the bus
    #[error("range sensor not responding")]
    Sensor,
    /// Sensor rejected the timing budget or ranging mode
    #[error("range sensor rejected configuration")]
    Configuration,
}
