//! Sweep State Machine
//!
//! Owns the radar state and advances the patrol sweep one step per call.
//!
//! # Modes
//! - Off: no automatic movement, manual `SET` still moves the servo
//! - Auto sweep: the angle advances by one step per elapsed interval
//! - Manual: the angle only changes on `SET`
//!
//! # Tick
//! The tick never waits. The caller invokes it as often as it likes, the sweep
//! only steps once [`SweepConfig::interval`] has passed since the previous step:
//!
//! ```text
//! read sample -> buffer (angle, distance) -> angle += direction * step
//!     -> at an edge: clamp, reverse, flush buffer
//!     -> command servo
//! ```
//!
//! # Ownership
//! There is exactly one [`Radar`] and it is owned by the radar task. Ticks,
//! commands and scans all take `&mut self`, so only one of them can touch the
//! state at a time.

use core::fmt::Write;

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::system::buffer::{SampleBuffer, SweepPoint};
use crate::system::command::Command;
use crate::system::config::{RadarConfig, SweepConfig};
use crate::system::hardware::{Actuator, Degrees, RangeSensor};
use crate::system::publish::{Publisher, Status, Topic};

/// Sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards the upper bound
    Increasing,
    /// Towards the lower bound
    Decreasing,
}

impl Direction {
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Increasing => 1,
            Direction::Decreasing => -1,
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }
}

/// Effective operating mode derived from the context flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Off,
    AutoSweep,
    Manual,
}

/// Mutable sweep state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepContext {
    /// Automatic sweeping enabled
    pub active: bool,
    /// Manual override, suspends automatic advancement
    pub manual: bool,
    /// Current servo angle, always inside the sweep window
    pub angle: Degrees,
    pub direction: Direction,
    /// Time of the last step, `None` steps on the next tick
    pub last_step: Option<Instant>,
}

impl SweepContext {
    pub const fn new(home_angle: Degrees) -> Self {
        Self {
            active: false,
            manual: false,
            angle: home_angle,
            direction: Direction::Increasing,
            last_step: None,
        }
    }

    pub const fn mode(&self) -> Mode {
        if self.manual {
            Mode::Manual
        } else if self.active {
            Mode::AutoSweep
        } else {
            Mode::Off
        }
    }
}

/// Radar: sweep state, sample buffer and the hardware it drives
pub struct Radar<A: Actuator, S: RangeSensor> {
    pub(crate) config: RadarConfig,
    pub(crate) context: SweepContext,
    pub(crate) buffer: SampleBuffer,
    pub(crate) actuator: A,
    pub(crate) sensor: S,
}

impl<A: Actuator, S: RangeSensor> Radar<A, S> {
    /// Creates the radar in standby and moves the servo to its home angle
    pub fn new(config: RadarConfig, mut actuator: A, sensor: S) -> Self {
        let home = config.sweep.home_angle;
        actuator.set_angle(home);
        log_info!("radar ready at {} deg", home);
        Self {
            config,
            context: SweepContext::new(home),
            buffer: SampleBuffer::new(),
            actuator,
            sensor,
        }
    }

    pub fn context(&self) -> &SweepContext {
        &self.context
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn is_active(&self) -> bool {
        self.context.active
    }

    pub fn mode(&self) -> Mode {
        self.context.mode()
    }

    /// Advances the patrol sweep if it is due
    ///
    /// Returns `true` if a step was taken. Does nothing while inactive, in manual
    /// mode, or before the step interval has elapsed.
    pub fn tick<P: Publisher>(&mut self, now: Instant, publisher: &mut P) -> bool {
        if self.context.mode() != Mode::AutoSweep {
            return false;
        }
        if let Some(last) = self.context.last_step {
            if now.saturating_duration_since(last) < self.config.sweep.interval {
                return false;
            }
        }
        self.context.last_step = Some(now);
        self.step(publisher);
        true
    }

    /// One patrol step: sample, advance, flush at an edge, move
    fn step<P: Publisher>(&mut self, publisher: &mut P) {
        let sweep = self.config.sweep;

        match self.sensor.read() {
            Ok(distance) => self.record(SweepPoint::new(self.context.angle, distance), publisher),
            Err(e) => log_debug!("sample at {} deg discarded: {:?}", self.context.angle, e),
        }

        let next = i32::from(self.context.angle) + self.context.direction.sign() * i32::from(sweep.step);
        self.context.angle = if next >= i32::from(sweep.max_angle) {
            self.reverse_at(sweep.max_angle, publisher)
        } else if next <= i32::from(sweep.min_angle) {
            self.reverse_at(sweep.min_angle, publisher)
        } else {
            // strictly inside the window
            next as Degrees
        };

        self.actuator.set_angle(self.context.angle);
    }

    /// Edge handling: turn around and flush the finished half-sweep
    fn reverse_at<P: Publisher>(&mut self, bound: Degrees, publisher: &mut P) -> Degrees {
        self.context.direction = self.context.direction.reversed();
        self.flush(publisher);
        bound
    }

    fn record<P: Publisher>(&mut self, point: SweepPoint, publisher: &mut P) {
        if self.buffer.is_full() {
            log_warn!("sample buffer full before sweep edge, flushing early");
            self.flush(publisher);
        }
        if let Err(point) = self.buffer.push(point) {
            log_error!("sample at {} deg dropped", point.angle);
        }
    }

    /// Publishes the buffered half-sweep and clears the buffer
    ///
    /// No-op on an empty buffer. The buffer is cleared even when the link is down.
    pub fn flush<P: Publisher>(&mut self, publisher: &mut P) {
        let count = self.buffer.len();
        match self.buffer.drain_json() {
            None => {}
            Some(Ok(json)) => {
                if publisher.try_publish(Topic::Buffer, &json) {
                    log_debug!("flushed {} points", count);
                }
            }
            Some(Err(_)) => log_error!("failed to serialize {} points", count),
        }
    }

    /// Parses and executes a control message, ignoring anything unknown
    pub fn handle_message<P: Publisher, D: DelayNs>(&mut self, message: &str, publisher: &mut P, delay: &mut D) {
        match Command::parse(message) {
            Some(command) => self.handle_command(command, publisher, delay),
            None => log_debug!("ignoring control message {}", message),
        }
    }

    /// Executes a control command
    ///
    /// Invalid requests (`SET` outside manual mode or outside the sweep window)
    /// are ignored without feedback.
    pub fn handle_command<P: Publisher, D: DelayNs>(&mut self, command: Command, publisher: &mut P, delay: &mut D) {
        log_info!("radar command {:?}", command);
        match command {
            Command::PowerOn => self.power_on(publisher),
            Command::PowerOff => {
                self.context.active = false;
                publisher.try_publish(Topic::Status, Status::Standby.as_str());
            }
            Command::ManualOn => self.context.manual = true,
            Command::ManualOff => self.context.manual = false,
            Command::SetAngle(angle) => {
                if !self.context.manual {
                    log_debug!("SET ignored outside manual mode");
                } else if !self.config.sweep.contains(angle) {
                    log_debug!("SET ignored, {} deg outside sweep window", angle);
                } else {
                    // range checked above
                    self.set_manual_angle(angle as Degrees, publisher, delay);
                }
            }
        }
    }

    /// Restarts the patrol sweep from the lower bound
    fn power_on<P: Publisher>(&mut self, publisher: &mut P) {
        let sweep: SweepConfig = self.config.sweep;
        self.context.active = true;
        self.context.manual = false;
        self.context.angle = sweep.min_angle;
        self.context.direction = Direction::Increasing;
        self.buffer.clear();
        self.actuator.set_angle(sweep.min_angle);
        publisher.try_publish(Topic::Status, Status::Online.as_str());
        log_info!("radar online, sweeping {}-{} deg", sweep.min_angle, sweep.max_angle);
    }

    /// Moves to `angle`, lets the servo settle and publishes one sample
    fn set_manual_angle<P: Publisher, D: DelayNs>(&mut self, angle: Degrees, publisher: &mut P, delay: &mut D) {
        self.context.angle = angle;
        self.actuator.set_angle(angle);
        delay.delay_ms(self.config.sweep.manual_settle_ms);

        let distance = match self.sensor.read() {
            Ok(distance) => distance,
            Err(e) => {
                log_warn!("manual sample at {} deg failed: {:?}", angle, e);
                return;
            }
        };

        let mut data: String<16> = String::new();
        if write!(data, "{},{}", angle, distance).is_ok() {
            publisher.try_publish(Topic::Data, &data);
        }
    }
}
