//! Test doubles for the radar hardware and transport

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::system::error::SensorError;
use crate::system::hardware::{Actuator, Degrees, Millimeters, RangeSensor};
use crate::system::publish::{Publisher, Topic};

/// Records every commanded angle
#[derive(Debug, Default)]
pub struct MockActuator {
    pub commands: Vec<Degrees>,
}

impl MockActuator {
    pub fn position(&self) -> Option<Degrees> {
        self.commands.last().copied()
    }
}

impl Actuator for MockActuator {
    fn set_angle(&mut self, angle: Degrees) {
        self.commands.push(angle);
    }
}

/// Replays scripted readings, then repeats the fallback
#[derive(Debug)]
pub struct MockSensor {
    pub readings: VecDeque<Result<Millimeters, SensorError>>,
    pub fallback: Result<Millimeters, SensorError>,
    pub reads: usize,
    pub restarts: usize,
    pub ranging: bool,
}

impl MockSensor {
    pub fn constant(distance: Millimeters) -> Self {
        Self {
            readings: VecDeque::new(),
            fallback: Ok(distance),
            reads: 0,
            restarts: 0,
            ranging: true,
        }
    }

    pub fn scripted<I>(readings: I, fallback: Result<Millimeters, SensorError>) -> Self
    where
        I: IntoIterator<Item = Result<Millimeters, SensorError>>,
    {
        Self {
            readings: readings.into_iter().collect(),
            fallback,
            reads: 0,
            restarts: 0,
            ranging: true,
        }
    }
}

impl RangeSensor for MockSensor {
    fn read(&mut self) -> Result<Millimeters, SensorError> {
        self.reads += 1;
        self.readings.pop_front().unwrap_or(self.fallback)
    }

    fn stop_continuous(&mut self) -> Result<(), SensorError> {
        self.ranging = false;
        Ok(())
    }

    fn start_continuous(&mut self) -> Result<(), SensorError> {
        self.ranging = true;
        self.restarts += 1;
        Ok(())
    }
}

/// Captures published messages
#[derive(Debug)]
pub struct MockPublisher {
    pub connected: bool,
    pub messages: Vec<(Topic, String)>,
}

impl MockPublisher {
    pub fn connected() -> Self {
        Self {
            connected: true,
            messages: Vec::new(),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            messages: Vec::new(),
        }
    }

    pub fn on(&self, topic: Topic) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(t, _)| *t == topic)
            .map(|(_, payload)| payload.as_str())
            .collect()
    }
}

impl Publisher for MockPublisher {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: Topic, payload: &str) {
        self.messages.push((topic, payload.to_string()));
    }
}

/// Accumulates requested delay instead of sleeping
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
