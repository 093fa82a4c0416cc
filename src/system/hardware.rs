//! Hardware seams
//!
//! The sweep core only talks to the servo and the distance sensor through these
//! traits. The firmware implements them on the RP2350 peripherals, tests use mocks.

use crate::system::error::SensorError;

/// Servo angle in whole degrees
pub type Degrees = u16;

/// Distance in millimeters
pub type Millimeters = u16;

/// Position-controlled rotational actuator
pub trait Actuator {
    /// Commands an absolute angle
    ///
    /// Fire-and-forget: returns before the servo has physically settled.
    fn set_angle(&mut self, angle: Degrees);
}

/// Missing actuator, left out after an init fault
///
/// Commands are dropped so the rest of the radar keeps running.
impl<A: Actuator> Actuator for Option<A> {
    fn set_angle(&mut self, angle: Degrees) {
        if let Some(actuator) = self {
            actuator.set_angle(angle);
        }
    }
}

/// Continuous-ranging distance sensor
pub trait RangeSensor {
    /// Returns the latest available range sample without waiting for a new one
    fn read(&mut self) -> Result<Millimeters, SensorError>;

    /// Stops continuous ranging
    fn stop_continuous(&mut self) -> Result<(), SensorError>;

    /// Starts continuous ranging
    fn start_continuous(&mut self) -> Result<(), SensorError>;
}

/// Last completed measurement of a continuously ranging sensor
///
/// Lets a driver answer reads without waiting for the measurement in flight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LatestSample {
    last: Option<Millimeters>,
}

impl LatestSample {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Folds in one poll of the sensor
    ///
    /// `Ok(None)` means no new measurement has completed, in which case the
    /// previous one is returned. Faults are passed through and keep the cache.
    pub fn update(&mut self, poll: Result<Option<Millimeters>, SensorError>) -> Result<Millimeters, SensorError> {
        match poll? {
            Some(distance) => {
                self.last = Some(distance);
                Ok(distance)
            }
            None => self.last.ok_or(SensorError::NotReady),
        }
    }

    /// Forgets the cached measurement, e.g. after ranging was restarted
    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn get(&self) -> Option<Millimeters> {
        self.last
    }
}
