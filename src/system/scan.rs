//! Full Scan Report
//!
//! Blocking, full resolution sweep over the whole window that produces a
//! human readable threat report.
//!
//! # Sequence
//! 1. Suspend the patrol sweep (state saved by [`ScanGuard`])
//! 2. Restart continuous ranging to drop stale samples
//! 3. Move to the lower bound, then sample every step up to the upper bound
//! 4. Restore servo angle, manual flag and active flag
//!
//! The scan monopolizes the caller for roughly two seconds. Nothing else runs on
//! the executor meanwhile, which is accepted.
//!
//! # Classification
//! - Readings at or below 20 mm, at or above 2000 mm, or faulted are discarded
//! - Valid readings below 1000 mm are threats
//! - Threats below 500 mm are HIGH, the rest MED

use core::fmt::{self, Write};
use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::system::config::ScanConfig;
use crate::system::hardware::{Actuator, Degrees, Millimeters, RangeSensor};
use crate::system::publish::{PAYLOAD_CAPACITY, Payload};
use crate::system::sweep::Radar;

/// Stand-in report when the rendered one does not fit
const REPORT_TOO_LONG: &str = "\n📡 *RADAR SCAN* (Full Sweep)\nReport too long\n";

const _: () = assert!(REPORT_TOO_LONG.len() <= PAYLOAD_CAPACITY);

/// Upper bound on scan positions (15°-165° in 5° steps is 31)
pub const MAX_SCAN_POSITIONS: usize = 64;

/// Threat severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MED",
        }
    }
}

/// Object closer than the threat distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threat {
    pub angle: Degrees,
    pub distance: Millimeters,
    pub severity: Severity,
}

/// Aggregated scan results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Threats in scan order
    pub threats: Vec<Threat, MAX_SCAN_POSITIONS>,
    /// Number of valid readings
    pub readings: usize,
    /// Closest valid reading
    pub min_distance: Option<Millimeters>,
    /// Farthest valid reading
    pub max_distance: Option<Millimeters>,
}

impl ScanReport {
    /// Folds one valid reading into the aggregates
    fn record(&mut self, config: &ScanConfig, angle: Degrees, distance: Millimeters) {
        self.readings += 1;
        self.min_distance = Some(self.min_distance.map_or(distance, |d| d.min(distance)));
        self.max_distance = Some(self.max_distance.map_or(distance, |d| d.max(distance)));

        if distance < config.threat_distance {
            let severity = if distance < config.high_threat_distance {
                Severity::High
            } else {
                Severity::Medium
            };
            let threat = Threat {
                angle,
                distance,
                severity,
            };
            if self.threats.push(threat).is_err() {
                log_warn!("threat list full, {} deg not reported", angle);
            }
        }
    }

    pub fn is_clear(&self) -> bool {
        self.threats.is_empty()
    }

    /// Renders the report into a bounded string
    pub fn render(&self) -> Result<Payload, fmt::Error> {
        let mut text = Payload::new();
        write!(text, "{}", self)?;
        Ok(text)
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\n📡 *RADAR SCAN* (Full Sweep)\n")?;

        if !self.threats.is_empty() {
            f.write_str("\n⚠️ *Threats Detected:*\n")?;
            for threat in &self.threats {
                writeln!(
                    f,
                    "{}° -> {}mm [{}]",
                    threat.angle,
                    threat.distance,
                    threat.severity.label()
                )?;
            }
        }

        f.write_str("\n📊 *Summary:*\n")?;
        writeln!(f, "Threats: {}", self.threats.len())?;
        writeln!(f, "Total Readings: {}", self.readings)?;
        if let (Some(min), Some(max)) = (self.min_distance, self.max_distance) {
            writeln!(f, "Range: {}-{}mm", min, max)?;
        }
        if self.is_clear() {
            f.write_str("✅ Area Clear\n")?;
        }
        Ok(())
    }
}

/// State captured before a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    active: bool,
    manual: bool,
    angle: Degrees,
}

/// Suspends the patrol sweep for the guard's lifetime
///
/// Dropping the guard restores the servo angle, the manual flag and the active
/// flag, and resets the step timer of a previously active sweep so it continues
/// on the very next tick. Restoration also happens on early return and unwind.
pub struct ScanGuard<'r, A: Actuator, S: RangeSensor> {
    radar: &'r mut Radar<A, S>,
    saved: Snapshot,
}

impl<'r, A: Actuator, S: RangeSensor> ScanGuard<'r, A, S> {
    pub fn engage(radar: &'r mut Radar<A, S>) -> Self {
        let saved = Snapshot {
            active: radar.context.active,
            manual: radar.context.manual,
            angle: radar.context.angle,
        };
        radar.context.active = false;
        Self { radar, saved }
    }
}

impl<A: Actuator, S: RangeSensor> Deref for ScanGuard<'_, A, S> {
    type Target = Radar<A, S>;

    fn deref(&self) -> &Self::Target {
        self.radar
    }
}

impl<A: Actuator, S: RangeSensor> DerefMut for ScanGuard<'_, A, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.radar
    }
}

impl<A: Actuator, S: RangeSensor> Drop for ScanGuard<'_, A, S> {
    fn drop(&mut self) {
        let saved = self.saved;
        self.radar.actuator.set_angle(saved.angle);
        let context = &mut self.radar.context;
        context.angle = saved.angle;
        context.manual = saved.manual;
        if saved.active {
            context.last_step = None;
        }
        context.active = saved.active;
    }
}

impl<A: Actuator, S: RangeSensor> Radar<A, S> {
    /// Runs a blocking full scan and returns the aggregated results
    ///
    /// Sensor faults are discarded readings, the scan always completes.
    pub fn full_scan<D: DelayNs>(&mut self, delay: &mut D) -> ScanReport {
        let scan = self.config.scan;
        let (first, last) = (self.config.sweep.min_angle, self.config.sweep.max_angle);
        log_info!("full scan {}-{} deg", first, last);

        let report = {
            let mut guard = ScanGuard::engage(self);
            delay.delay_ms(scan.pause_ms);
            guard.restart_ranging(&scan, delay);

            guard.actuator.set_angle(first);
            delay.delay_ms(scan.start_settle_ms);

            let mut report = ScanReport::default();
            for angle in (first..=last).step_by(usize::from(scan.step.max(1))) {
                guard.actuator.set_angle(angle);
                delay.delay_ms(scan.step_settle_ms);
                match guard.sensor.read() {
                    Ok(distance) if scan.is_valid(distance) => report.record(&scan, angle, distance),
                    Ok(distance) => log_debug!("{} deg: {} mm out of range", angle, distance),
                    Err(e) => log_debug!("{} deg: {:?}", angle, e),
                }
            }
            report
        };
        delay.delay_ms(scan.restore_settle_ms);

        log_info!(
            "full scan done: {} threats, {} valid readings",
            report.threats.len(),
            report.readings
        );
        report
    }

    /// Runs a blocking full scan and renders the report text
    pub fn scan_report<D: DelayNs>(&mut self, delay: &mut D) -> Payload {
        match self.full_scan(delay).render() {
            Ok(text) => text,
            Err(_) => {
                log_error!("scan report exceeds {} bytes", PAYLOAD_CAPACITY);
                let mut text = Payload::new();
                // Fixed text, far below the payload capacity
                text.push_str(REPORT_TOO_LONG).ok();
                text
            }
        }
    }

    /// Stops and restarts continuous ranging so the next read is fresh
    fn restart_ranging<D: DelayNs>(&mut self, scan: &ScanConfig, delay: &mut D) {
        if let Err(e) = self.sensor.stop_continuous() {
            log_warn!("stop ranging failed: {:?}", e);
        }
        delay.delay_ms(scan.ranging_restart_ms);
        if let Err(e) = self.sensor.start_continuous() {
            log_warn!("start ranging failed: {:?}", e);
        }
        delay.delay_ms(scan.ranging_restart_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::command::Command;
    use crate::system::config::RadarConfig;
    use crate::system::error::SensorError;
    use crate::system::mock::{MockActuator, MockDelay, MockPublisher, MockSensor};
    use crate::system::sweep::Mode;
    use embassy_time::Instant;

    fn radar(sensor: MockSensor) -> Radar<MockActuator, MockSensor> {
        Radar::new(RadarConfig::default(), MockActuator::default(), sensor)
    }

    #[test]
    fn test_scan_visits_every_position() {
        let mut radar = radar(MockSensor::constant(1500));
        let report = radar.full_scan(&mut MockDelay::default());

        let commands = &radar.actuator().commands;
        // home, start bound, 31 scan positions, restore
        assert_eq!(commands.len(), 1 + 1 + 31 + 1);
        assert_eq!(commands[1], 15);
        assert!(commands[2..33].iter().copied().eq((15..=165).step_by(5)));
        assert_eq!(radar.sensor().reads, 31);
        assert_eq!(radar.sensor().restarts, 1);
        assert!(radar.sensor().ranging);
        assert_eq!(report.readings, 31);
        assert!(report.is_clear());
    }

    #[test]
    fn test_scan_timing() {
        let mut radar = radar(MockSensor::constant(1500));
        let mut delay = MockDelay::default();
        radar.full_scan(&mut delay);
        // pause + 2 ranging restarts + start settle + 31 steps + restore
        assert_eq!(delay.elapsed_ms(), 50 + 60 + 300 + 31 * 50 + 100);
    }

    #[test]
    fn test_scan_during_patrol_restores_state() {
        let mut publisher = MockPublisher::connected();
        let mut delay = MockDelay::default();
        let mut radar = radar(MockSensor::constant(1500));
        radar.handle_command(Command::PowerOn, &mut publisher, &mut delay);
        for i in 0..15 {
            assert!(radar.tick(Instant::from_millis(i * 100), &mut publisher));
        }
        assert_eq!(radar.context().angle, 90);

        let readings = (0..31).map(|i| Ok(if i % 2 == 0 { 1500 } else { 600 }));
        radar.sensor = MockSensor::scripted(readings, Ok(1500));
        let text = radar.scan_report(&mut delay);

        assert!(text.contains("*Threats Detected:*"));
        assert!(text.contains("[MED]"));
        assert!(!text.contains("[HIGH]"));
        assert!(text.contains("Threats: 15\n"));
        assert!(text.contains("Total Readings: 31\n"));
        assert!(text.contains("Range: 600-1500mm\n"));
        assert!(!text.contains("Area Clear"));

        assert_eq!(radar.actuator().position(), Some(90));
        assert_eq!(radar.context().angle, 90);
        assert_eq!(radar.mode(), Mode::AutoSweep);
        assert_eq!(radar.context().last_step, None);

        // 1 ms after the last patrol step, still steps immediately
        assert!(radar.tick(Instant::from_millis(1401), &mut publisher));
        assert_eq!(radar.context().angle, 95);
    }

    #[test]
    fn test_scan_preserves_standby_and_manual() {
        let mut publisher = MockPublisher::connected();
        let mut delay = MockDelay::default();
        let mut radar = radar(MockSensor::constant(300));
        radar.handle_command(Command::ManualOn, &mut publisher, &mut delay);
        radar.handle_command(Command::SetAngle(40), &mut publisher, &mut delay);
        let before = *radar.context();

        radar.full_scan(&mut delay);

        assert_eq!(*radar.context(), before);
        assert_eq!(radar.actuator().position(), Some(40));
        assert_eq!(radar.mode(), Mode::Manual);
    }

    #[test]
    fn test_scan_keeps_rate_limiter_when_inactive() {
        let mut publisher = MockPublisher::connected();
        let mut delay = MockDelay::default();
        let mut radar = radar(MockSensor::constant(1500));
        radar.handle_command(Command::PowerOn, &mut publisher, &mut delay);
        assert!(radar.tick(Instant::from_millis(0), &mut publisher));
        radar.handle_command(Command::PowerOff, &mut publisher, &mut delay);

        radar.full_scan(&mut delay);

        assert!(!radar.is_active());
        assert_eq!(radar.context().last_step, Some(Instant::from_millis(0)));
    }

    #[test]
    fn test_scan_with_all_faults_still_reports() {
        let mut radar = radar(MockSensor::scripted([], Err(SensorError::Timeout)));
        let text = radar.scan_report(&mut MockDelay::default());

        assert!(text.starts_with("\n📡 *RADAR SCAN* (Full Sweep)\n"));
        assert!(text.contains("Threats: 0\nTotal Readings: 0\n"));
        assert!(!text.contains("Range:"));
        assert!(text.ends_with("✅ Area Clear\n"));
        assert_eq!(radar.actuator().position(), Some(90));
    }

    #[test]
    fn test_scan_discards_implausible_readings() {
        let readings = [Ok(20), Ok(21), Ok(2000), Ok(1999), Err(SensorError::Bus), Ok(499), Ok(500)];
        let mut radar = radar(MockSensor::scripted(readings, Ok(0)));
        let report = radar.full_scan(&mut MockDelay::default());

        assert_eq!(report.readings, 4);
        assert_eq!(report.min_distance, Some(21));
        assert_eq!(report.max_distance, Some(1999));
        let threats: &[Threat] = &report.threats;
        assert_eq!(
            threats,
            &[
                Threat { angle: 20, distance: 21, severity: Severity::High },
                Threat { angle: 40, distance: 499, severity: Severity::High },
                Threat { angle: 45, distance: 500, severity: Severity::Medium },
            ]
        );
    }

    #[test]
    fn test_report_layout() {
        let mut report = ScanReport::default();
        let config = ScanConfig::default();
        report.record(&config, 30, 450);
        report.record(&config, 35, 1500);
        report.record(&config, 40, 800);

        let text = report.render().unwrap();
        assert_eq!(
            text.as_str(),
            "\n📡 *RADAR SCAN* (Full Sweep)\n\
             \n⚠️ *Threats Detected:*\n\
             30° -> 450mm [HIGH]\n\
             40° -> 800mm [MED]\n\
             \n📊 *Summary:*\n\
             Threats: 2\n\
             Total Readings: 3\n\
             Range: 450-1500mm\n"
        );
    }

    #[test]
    fn test_worst_case_report_fits() {
        let mut report = ScanReport::default();
        let config = ScanConfig::default();
        // Longest lines: three digit angles, HIGH labels, every position a threat
        for angle in (15..=165).step_by(5) {
            report.record(&config, angle, 499);
        }
        assert!(report.threats.iter().all(|t| t.severity == Severity::High));
        let text = report.render().unwrap();
        assert_eq!(report.threats.len(), 31);
        assert!(text.ends_with("Range: 499-499mm\n"));
    }

    #[test]
    fn test_guard_restores_on_unwind() {
        let mut radar = radar(MockSensor::constant(1500));
        radar.context.active = true;
        radar.context.angle = 120;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = ScanGuard::engage(&mut radar);
            guard.actuator.set_angle(15);
            assert!(!guard.context().active);
            panic!("scan step failed");
        }));

        assert!(result.is_err());
        assert!(radar.is_active());
        assert_eq!(radar.context().angle, 120);
        assert_eq!(radar.actuator().position(), Some(120));
        assert_eq!(radar.context().last_step, None);
    }
}
