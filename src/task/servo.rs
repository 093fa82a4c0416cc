//! Radar Servo
//!
//! Positions the sensor mount. The Pi Pico2 PWM slices are left for other
//! peripherals, so the servo pulse is generated by a PIO state machine running the
//! embassy PIO PWM program.
//!
//! Calibration comes from [`ServoConfig`](radar_sweep::system::config::ServoConfig)
//! and is validated before the builder runs.

use core::time::Duration;

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::pwm::PioPwm;
use radar_sweep::log_debug;
use radar_sweep::system::hardware::{Actuator, Degrees};

const DEFAULT_MIN_PULSE_WIDTH: u64 = 1000; // uncalibrated default, the shortest duty cycle sent to a servo
const DEFAULT_MAX_PULSE_WIDTH: u64 = 2000; // uncalibrated default, the longest duty cycle sent to a servo
const DEFAULT_MAX_DEGREE_ROTATION: Degrees = 160; // 160 degrees is typical
const REFRESH_INTERVAL: u64 = 20000; // The period of each cycle

pub struct ServoBuilder<'d, T: Instance, const SM: usize> {
    pwm: PioPwm<'d, T, SM>,
    period: Duration,
    min_pulse_width: Duration,
    max_pulse_width: Duration,
    max_degree_rotation: Degrees,
}

impl<'d, T: Instance, const SM: usize> ServoBuilder<'d, T, SM> {
    pub fn new(pwm: PioPwm<'d, T, SM>) -> Self {
        Self {
            pwm,
            period: Duration::from_micros(REFRESH_INTERVAL),
            min_pulse_width: Duration::from_micros(DEFAULT_MIN_PULSE_WIDTH),
            max_pulse_width: Duration::from_micros(DEFAULT_MAX_PULSE_WIDTH),
            max_degree_rotation: DEFAULT_MAX_DEGREE_ROTATION,
        }
    }

    pub fn set_period(mut self, duration: Duration) -> Self {
        self.period = duration;
        self
    }

    pub fn set_min_pulse_width(mut self, duration: Duration) -> Self {
        self.min_pulse_width = duration;
        self
    }

    pub fn set_max_pulse_width(mut self, duration: Duration) -> Self {
        self.max_pulse_width = duration;
        self
    }

    pub fn set_max_degree_rotation(mut self, degree: Degrees) -> Self {
        self.max_degree_rotation = degree;
        self
    }

    pub fn build(mut self) -> Servo<'d, T, SM> {
        self.pwm.set_period(self.period);
        Servo {
            pwm: self.pwm,
            min_pulse_width: self.min_pulse_width,
            max_pulse_width: self.max_pulse_width,
            max_degree_rotation: self.max_degree_rotation,
        }
    }
}

pub struct Servo<'d, T: Instance, const SM: usize> {
    pwm: PioPwm<'d, T, SM>,
    min_pulse_width: Duration,
    max_pulse_width: Duration,
    max_degree_rotation: Degrees,
}

impl<'d, T: Instance, const SM: usize> Servo<'d, T, SM> {
    pub fn start(&mut self) {
        self.pwm.start();
    }

    /// Pulse width for `degree`, clamped to the servo's travel
    fn pulse_width(&self, degree: Degrees) -> Duration {
        let degree = u64::from(degree.min(self.max_degree_rotation));
        let min = self.min_pulse_width.as_micros() as u64;
        let max = self.max_pulse_width.as_micros() as u64;
        let span = max.saturating_sub(min);
        let pulse = min + degree * span / u64::from(self.max_degree_rotation.max(1));
        Duration::from_micros(pulse.min(max))
    }

    pub fn rotate(&mut self, degree: Degrees) {
        let duration = self.pulse_width(degree);
        log_debug!("servo {} deg -> {} us", degree, duration.as_micros() as u64);
        self.pwm.write(duration);
    }
}

impl<T: Instance, const SM: usize> Actuator for Servo<'_, T, SM> {
    fn set_angle(&mut self, angle: Degrees) {
        self.rotate(angle);
    }
}
