//! Radar Configuration
//!
//! Compile-time defaults for the patrol sweep and the full scan, grouped so the
//! [`Radar`](crate::system::sweep::Radar) can be built with different values in tests.
//!
//! # Mechanical Range
//! The servo mount limits the usable sweep to 15°-165°. Both the patrol sweep and
//! the full scan stay inside this window.
//!
//! # Sensor Validity
//! The time-of-flight sensor reports values up to ~8 m, but anything at or above
//! 2 m is unreliable with the configured timing budget, and anything at or below
//! 20 mm is the cover glass.
//!
//! # Servo Calibration
//! MG90S: 50 Hz refresh, 500-2400 µs pulses over 180° of travel.

use embassy_time::Duration;

use crate::system::error::InitError;
use crate::system::hardware::{Degrees, Millimeters};

/// Lower mechanical bound of the sweep
pub const SWEEP_MIN_ANGLE: Degrees = 15;

/// Upper mechanical bound of the sweep
pub const SWEEP_MAX_ANGLE: Degrees = 165;

/// Angle the servo rests at after power-up
pub const HOME_ANGLE: Degrees = 90;

/// Degrees advanced per patrol step
pub const SWEEP_STEP: Degrees = 5;

/// Minimum time between two patrol steps
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// Settle time before sampling after a manual `SET`
const MANUAL_SETTLE_MS: u32 = 30;

/// Pause after suspending the patrol so an in-flight servo move completes
const SCAN_PAUSE_MS: u32 = 50;

/// Delay after each stop/start of continuous ranging
const RANGING_RESTART_MS: u32 = 30;

/// Time for the servo to travel to the start bound
const SCAN_START_SETTLE_MS: u32 = 300;

/// Servo settle per scan step
const SCAN_STEP_SETTLE_MS: u32 = 50;

/// Time for the servo to travel back to the saved angle
const SCAN_RESTORE_SETTLE_MS: u32 = 100;

/// Readings at or below this are discarded
const MIN_VALID_DISTANCE: Millimeters = 20;

/// Readings at or above this are discarded
const MAX_VALID_DISTANCE: Millimeters = 2000;

/// Objects closer than this are reported as threats
const THREAT_DISTANCE: Millimeters = 1000;

/// Threats closer than this are rated HIGH instead of MED
const HIGH_THREAT_DISTANCE: Millimeters = 500;

/// Servo refresh period in µs (50 Hz)
const SERVO_PERIOD_US: u32 = 20_000;

/// Pulse width at 0°
const SERVO_MIN_PULSE_US: u32 = 500;

/// Pulse width at full travel
const SERVO_MAX_PULSE_US: u32 = 2400;

/// Mechanical travel covered by the pulse range
const SERVO_TRAVEL: Degrees = 180;

/// Patrol sweep parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Lower bound (inclusive)
    pub min_angle: Degrees,
    /// Upper bound (inclusive)
    pub max_angle: Degrees,
    /// Initial servo position
    pub home_angle: Degrees,
    /// Degrees per step
    pub step: Degrees,
    /// Rate limit between steps
    pub interval: Duration,
    /// Settle time for a manual `SET` before sampling
    pub manual_settle_ms: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_angle: SWEEP_MIN_ANGLE,
            max_angle: SWEEP_MAX_ANGLE,
            home_angle: HOME_ANGLE,
            step: SWEEP_STEP,
            interval: SWEEP_INTERVAL,
            manual_settle_ms: MANUAL_SETTLE_MS,
        }
    }
}

impl SweepConfig {
    /// Whether `angle` lies inside the mechanical window
    pub fn contains(&self, angle: i32) -> bool {
        (i32::from(self.min_angle)..=i32::from(self.max_angle)).contains(&angle)
    }
}

/// Full scan parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Degrees between scan samples
    pub step: Degrees,
    pub pause_ms: u32,
    pub ranging_restart_ms: u32,
    pub start_settle_ms: u32,
    pub step_settle_ms: u32,
    pub restore_settle_ms: u32,
    /// Exclusive lower validity limit
    pub min_valid: Millimeters,
    /// Exclusive upper validity limit
    pub max_valid: Millimeters,
    /// Exclusive threat limit
    pub threat_distance: Millimeters,
    /// Exclusive HIGH severity limit
    pub high_threat_distance: Millimeters,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step: SWEEP_STEP,
            pause_ms: SCAN_PAUSE_MS,
            ranging_restart_ms: RANGING_RESTART_MS,
            start_settle_ms: SCAN_START_SETTLE_MS,
            step_settle_ms: SCAN_STEP_SETTLE_MS,
            restore_settle_ms: SCAN_RESTORE_SETTLE_MS,
            min_valid: MIN_VALID_DISTANCE,
            max_valid: MAX_VALID_DISTANCE,
            threat_distance: THREAT_DISTANCE,
            high_threat_distance: HIGH_THREAT_DISTANCE,
        }
    }
}

impl ScanConfig {
    /// Whether a reading is physically plausible
    pub fn is_valid(&self, distance: Millimeters) -> bool {
        distance > self.min_valid && distance < self.max_valid
    }
}

/// Servo pulse calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoConfig {
    pub period_us: u32,
    pub min_pulse_us: u32,
    pub max_pulse_us: u32,
    pub travel: Degrees,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            period_us: SERVO_PERIOD_US,
            min_pulse_us: SERVO_MIN_PULSE_US,
            max_pulse_us: SERVO_MAX_PULSE_US,
            travel: SERVO_TRAVEL,
        }
    }
}

impl ServoConfig {
    /// Checks the calibration can drive the servo up to `max_angle`
    pub fn validate(&self, max_angle: Degrees) -> Result<(), InitError> {
        if self.min_pulse_us >= self.max_pulse_us || self.max_pulse_us > self.period_us {
            return Err(InitError::Actuator);
        }
        if self.travel == 0 || self.travel < max_angle {
            return Err(InitError::Actuator);
        }
        Ok(())
    }
}

/// Complete radar configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadarConfig {
    pub sweep: SweepConfig,
    pub scan: ScanConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_window() {
        let config = SweepConfig::default();
        assert!(config.contains(15));
        assert!(config.contains(165));
        assert!(!config.contains(14));
        assert!(!config.contains(166));
        assert!(!config.contains(-90));
    }

    #[test]
    fn test_default_servo_calibration_is_valid() {
        assert_eq!(ServoConfig::default().validate(SWEEP_MAX_ANGLE), Ok(()));
    }

    #[test]
    fn test_bad_servo_calibration_is_an_actuator_fault() {
        let inverted = ServoConfig {
            min_pulse_us: 2400,
            max_pulse_us: 500,
            ..ServoConfig::default()
        };
        assert_eq!(inverted.validate(SWEEP_MAX_ANGLE), Err(InitError::Actuator));

        let too_long = ServoConfig {
            max_pulse_us: 25_000,
            ..ServoConfig::default()
        };
        assert_eq!(too_long.validate(SWEEP_MAX_ANGLE), Err(InitError::Actuator));

        let short_travel = ServoConfig {
            travel: 160,
            ..ServoConfig::default()
        };
        assert_eq!(short_travel.validate(SWEEP_MAX_ANGLE), Err(InitError::Actuator));
    }

    #[test]
    fn test_scan_validity_limits_are_exclusive() {
        let config = ScanConfig::default();
        assert!(!config.is_valid(20));
        assert!(config.is_valid(21));
        assert!(config.is_valid(1999));
        assert!(!config.is_valid(2000));
    }
}
