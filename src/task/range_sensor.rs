//! Range sensor handling
//!
//! VL53L0X time-of-flight sensor on I2C0, ranging continuously in back-to-back
//! mode. Reads only poll the measurement status: a completed measurement
//! replaces the cached sample, otherwise the cached one is returned, so a
//! patrol tick never waits on the sensor.
//!
//! # Configuration
//! - Timing budget 20 ms: fast enough for a 100 ms patrol step, reliable up to ~2 m
//! - Continuous ranging started at init and restarted before every full scan
//! - Restarting ranging drops the cached sample so a scan never sees stale data
//!
//! # Error Handling
//! A sensor that fails to initialize is kept as unavailable. Every read then
//! reports [`SensorError::NotReady`] and the sweep discards the sample, so the
//! servo keeps patrolling even without distance data.

use defmt::{error, info};
use embassy_rp::i2c::{Blocking, Config, I2c};
use embassy_rp::peripherals::I2C0;
use radar_sweep::system::error::{InitError, SensorError};
use radar_sweep::system::hardware::{LatestSample, Millimeters, RangeSensor};
use vl53l0x::VL53L0x;

use crate::task::resources::RangeSensorResources;

/// I2C fast mode
const I2C_FREQUENCY: u32 = 400_000;

/// Measurement timing budget in µs
const MEASUREMENT_TIMING_BUDGET: u32 = 20_000;

/// Back-to-back ranging
const CONTINUOUS_PERIOD_MS: u32 = 0;

type SensorBus = I2c<'static, I2C0, Blocking>;

/// VL53L0X wrapper, `None` when initialization failed
pub struct RangeSensorDriver {
    device: Option<VL53L0x<SensorBus>>,
    latest: LatestSample,
}

impl RangeSensorDriver {
    /// Brings up the bus and the sensor, degrading instead of failing
    pub fn new(r: RangeSensorResources) -> Self {
        let mut config = Config::default();
        config.frequency = I2C_FREQUENCY;
        let i2c = I2c::new_blocking(r.i2c, r.scl, r.sda, config);

        match init_device(i2c) {
            Ok(device) => {
                info!("range sensor ready");
                Self {
                    device: Some(device),
                    latest: LatestSample::new(),
                }
            }
            Err(e) => {
                error!("range sensor unavailable: {}", e);
                Self {
                    device: None,
                    latest: LatestSample::new(),
                }
            }
        }
    }

    fn device(&mut self) -> Result<&mut VL53L0x<SensorBus>, SensorError> {
        self.device.as_mut().ok_or(SensorError::NotReady)
    }
}

fn init_device(i2c: SensorBus) -> Result<VL53L0x<SensorBus>, InitError> {
    let mut device = VL53L0x::new(i2c).map_err(|_| InitError::Sensor)?;
    device
        .set_measurement_timing_budget(MEASUREMENT_TIMING_BUDGET)
        .map_err(|_| InitError::Configuration)?;
    device
        .start_continuous(CONTINUOUS_PERIOD_MS)
        .map_err(|_| InitError::Configuration)?;
    Ok(device)
}

impl RangeSensor for RangeSensorDriver {
    fn read(&mut self) -> Result<Millimeters, SensorError> {
        let poll = match self.device()?.read_range_mm() {
            Ok(distance) => Ok(Some(distance)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(_)) => Err(SensorError::Bus),
        };
        self.latest.update(poll)
    }

    fn stop_continuous(&mut self) -> Result<(), SensorError> {
        self.device()?.stop_continuous().map_err(|_| SensorError::Bus)
    }

    fn start_continuous(&mut self) -> Result<(), SensorError> {
        self.latest.clear();
        self.device()?
            .start_continuous(CONTINUOUS_PERIOD_MS)
            .map_err(|_| SensorError::Bus)
    }
}
