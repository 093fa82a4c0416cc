//! Radar Task
//!
//! Owns the [`Radar`] and is the only place that touches it. Each pass waits for
//! whichever comes first:
//! - a control message: applied immediately
//! - a scan request: runs the blocking full scan and publishes the report
//! - the loop period: the arbiter picks either a sweep tick or a telemetry slot
//!
//! The full scan blocks the whole executor for about two seconds. Other tasks,
//! including the uplink, resume once it is done.

use defmt::{error, info};
use embassy_futures::select::{select3, Either3};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::pwm::{PioPwm, PioPwmProgram};
use embassy_time::{Delay, Duration, Instant, Timer};
use radar_sweep::system::arbiter::{LoopArbiter, Slot};
use radar_sweep::system::config::{RadarConfig, ServoConfig};
use radar_sweep::system::event;
use radar_sweep::system::publish::{ChannelPublisher, Publisher, Topic};
use radar_sweep::system::sweep::Radar;

use crate::task::range_sensor::RangeSensorDriver;
use crate::task::resources::{Irqs, RadarServoResources, RangeSensorResources};
use crate::task::servo::ServoBuilder;

/// Main loop period, well below the sweep step interval
const LOOP_PERIOD: Duration = Duration::from_millis(10);

/// Radar control task
#[embassy_executor::task]
pub async fn radar(s: RadarServoResources, r: RangeSensorResources) {
    info!("Initializing radar");
    let config = RadarConfig::default();
    let servo_config = ServoConfig::default();

    let Pio { mut common, sm0, .. } = Pio::new(s.pio, Irqs);
    let prg = PioPwmProgram::new(&mut common);
    let pwm_pio = PioPwm::new(&mut common, sm0, s.pin, &prg);
    let servo = match servo_config.validate(config.sweep.max_angle) {
        Ok(()) => {
            let mut servo = ServoBuilder::new(pwm_pio)
                .set_period(micros(servo_config.period_us))
                .set_max_degree_rotation(servo_config.travel)
                .set_min_pulse_width(micros(servo_config.min_pulse_us))
                .set_max_pulse_width(micros(servo_config.max_pulse_us))
                .build();
            servo.start();
            Some(servo)
        }
        Err(e) => {
            error!("servo unavailable: {}", e);
            None
        }
    };

    let sensor = RangeSensorDriver::new(r);
    let mut radar = Radar::new(config, servo, sensor);
    let mut publisher = ChannelPublisher;
    let mut arbiter = LoopArbiter::default();
    let mut delay = Delay;

    loop {
        match select3(event::wait_control(), event::wait_scan_request(), Timer::after(LOOP_PERIOD)).await {
            Either3::First(message) => {
                radar.handle_message(&message, &mut publisher, &mut delay);
            }
            Either3::Second(()) => {
                let report = radar.scan_report(&mut delay);
                publisher.try_publish(Topic::Report, &report);
            }
            Either3::Third(()) => {
                let now = Instant::now();
                match arbiter.select(now, radar.is_active()) {
                    Slot::Radar => {
                        radar.tick(now, &mut publisher);
                    }
                    Slot::Telemetry => event::signal_telemetry_due(),
                    Slot::Idle => {}
                }
            }
        }
    }
}

fn micros(us: u32) -> core::time::Duration {
    core::time::Duration::from_micros(u64::from(us))
}
