//! Sample Buffer
//!
//! Collects the `(angle, distance)` pairs of one half-sweep. The buffer is
//! serialized as a JSON array of pairs and cleared whenever the sweep reaches an
//! edge.
//!
//! # Capacity
//! A half-sweep over 15°-165° in 5° steps produces 30 points. The buffer holds 40
//! so a sweep resumed from an arbitrary manual angle still fits.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::system::hardware::{Degrees, Millimeters};

/// Maximum number of buffered points
pub const BUFFER_CAPACITY: usize = 40;

/// Longest possible serialized pair, `[65535,65535],`
const MAX_PAIR_LEN: usize = 14;

/// Size of the JSON payload for a full buffer
pub const JSON_CAPACITY: usize = BUFFER_CAPACITY * MAX_PAIR_LEN + 2;

/// Serialized buffer payload
pub type BufferJson = String<JSON_CAPACITY>;

/// A single distance sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepPoint {
    pub angle: Degrees,
    pub distance: Millimeters,
}

impl SweepPoint {
    pub const fn new(angle: Degrees, distance: Millimeters) -> Self {
        Self { angle, distance }
    }
}

/// Ordered samples of the current half-sweep
#[derive(Debug, Default)]
pub struct SampleBuffer {
    points: Vec<SweepPoint, BUFFER_CAPACITY>,
}

impl SampleBuffer {
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Appends a point, handing it back if the buffer is full
    pub fn push(&mut self, point: SweepPoint) -> Result<(), SweepPoint> {
        self.points.push(point)
    }

    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.points.is_full()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Serializes the points as `[[angle,distance],...]`
    pub fn to_json(&self) -> Result<BufferJson, fmt::Error> {
        let mut json = BufferJson::new();
        json.push('[').map_err(|_| fmt::Error)?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                json.push(',').map_err(|_| fmt::Error)?;
            }
            write!(json, "[{},{}]", point.angle, point.distance)?;
        }
        json.push(']').map_err(|_| fmt::Error)?;
        Ok(json)
    }

    /// Serializes and clears the buffer
    ///
    /// Returns `None` without touching anything when the buffer is empty. The
    /// buffer is cleared even if serialization fails.
    pub fn drain_json(&mut self) -> Option<Result<BufferJson, fmt::Error>> {
        if self.is_empty() {
            return None;
        }
        let json = self.to_json();
        self.clear();
        Some(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let mut buffer = SampleBuffer::new();
        buffer.push(SweepPoint::new(15, 420)).unwrap();
        buffer.push(SweepPoint::new(20, 1337)).unwrap();
        assert_eq!(buffer.to_json().unwrap().as_str(), "[[15,420],[20,1337]]");
    }

    #[test]
    fn test_empty_buffer_does_not_drain() {
        let mut buffer = SampleBuffer::new();
        assert!(buffer.drain_json().is_none());
    }

    #[test]
    fn test_drain_clears_buffer() {
        let mut buffer = SampleBuffer::new();
        buffer.push(SweepPoint::new(90, 800)).unwrap();
        let json = buffer.drain_json().unwrap().unwrap();
        assert_eq!(json.as_str(), "[[90,800]]");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_full_buffer_fits_json_capacity() {
        let mut buffer = SampleBuffer::new();
        for _ in 0..BUFFER_CAPACITY {
            buffer.push(SweepPoint::new(Degrees::MAX, Millimeters::MAX)).unwrap();
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.push(SweepPoint::new(15, 1)), Err(SweepPoint::new(15, 1)));
        assert!(buffer.to_json().is_ok());
    }
}
