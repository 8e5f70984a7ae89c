//! # TI ADS1015/ADS1115 Driver
//!
//! Drives up to four ADS1x15 converters sharing one I2C bus. Conversions are
//! either read back immediately with [`Ads1x15::read`] or started with
//! [`Ads1x15::start_read`] and delivered to a completion handler once the
//! device's [`Timer`] fires.

#![cfg_attr(not(test), no_std)]

use crate::device::{Device, Registry};
use crate::registers::Register;
use byteorder::{BigEndian, ByteOrder};
use core::result::Result;
use embedded_hal_async::i2c;

#[cfg(feature = "defmt")]
use defmt::debug;

mod device;
mod registers;
mod scheduler;
mod threshold;

pub use crate::registers::{
    Address, ChipVariant, ComparatorMode, ComparatorQueue, Config, Gain, Mode, Mux, RangeError,
    SampleRate, ADDR_GND, ADDR_SCL, ADDR_SDA, ADDR_VDD, DEFAULT_CONFIG,
};
pub use crate::scheduler::{Clock, Timer, Trigger};
pub use crate::threshold::{Comparator, ThresholdMillivolts, Thresholds};

/// Reserved address every device on the bus answers to.
const GENERAL_CALL_ADDRESS: u8 = 0x00;
/// General-call command that resets all devices to their power-on state.
const RESET_COMMAND: u8 = 0x06;

/// Argument that failed validation.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Argument {
    Address,
    ChipVariant,
    Gain,
    SampleRate,
    Channel,
    Mode,
    ComparatorQueue,
    ComparatorMode,
    /// Low threshold above high threshold.
    ThresholdOrder,
    ThresholdLow,
    ThresholdHigh,
    /// A timer-gated conversion needs a completion handler.
    Handler,
}

/// Errors that can occur when using the ADS1x15 driver.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<I2cErr> {
    I2c(I2cErr),
    InvalidArgument(Argument),
    /// The config register did not read back its power-on value.
    DeviceNotFound,
    /// No device has been set up at this address.
    Uninitialized,
}

impl<I2cErr> From<Argument> for Error<I2cErr> {
    fn from(argument: Argument) -> Self {
        Error::InvalidArgument(argument)
    }
}

/// A scaled conversion result.
#[derive(PartialEq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub millivolts: f64,
    /// Fractional part of `millivolts` in thousandths, without sign.
    pub fraction: u16,
    /// Raw conversion register value.
    pub raw: i16,
}

impl Reading {
    pub fn from_raw(gain: Gain, raw: i16) -> Self {
        let millivolts = gain.code_to_millivolts(raw);
        let fraction = ((millivolts - f64::from(millivolts as i32)) * 1000.0) as i32;
        Self {
            millivolts,
            fraction: fraction.unsigned_abs() as u16,
            raw,
        }
    }
}

/// Settings applied by [`Ads1x15::setting`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Settings {
    pub gain: Gain,
    pub sample_rate: SampleRate,
    pub channel: Mux,
    pub mode: Mode,
    /// ALERT/RDY configuration. `None` disables the comparator.
    ///
    /// When set, both threshold registers are written, even without bounds:
    /// the conversion-ready pair `0x7FFF`/`0x8000` is sent in that case.
    pub comparator: Option<Comparator>,
}

/// ADS1x15 async driver.
pub struct Ads1x15<I2C, T, CLK, F>
where
    I2C: i2c::I2c,
    T: Timer,
    CLK: Clock,
    F: FnOnce(Reading),
{
    i2c: I2C,
    clock: CLK,
    devices: Registry<T, F>,
}

impl<I2C, T, CLK, F, I2cErr> Ads1x15<I2C, T, CLK, F>
where
    I2C: i2c::I2c<Error = I2cErr>,
    T: Timer,
    CLK: Clock,
    F: FnOnce(Reading),
{
    /// Creates a driver with no devices set up.
    pub fn new(i2c: I2C, clock: CLK) -> Self {
        Self {
            i2c,
            clock,
            devices: Registry::new(),
        }
    }

    /// Soft-resets every device on the bus.
    ///
    /// Devices keep their driver-side settings but the hardware is back at its
    /// power-on config; call [`Self::setting`] again before starting
    /// conversions.
    pub async fn reset(&mut self) -> Result<(), Error<I2cErr>> {
        self.i2c
            .write(GENERAL_CALL_ADDRESS, &[RESET_COMMAND])
            .await
            .map_err(Error::I2c)
    }

    /// Probes for a device at `address` and registers it with power-on
    /// defaults, replacing any device set up there before.
    ///
    /// # Arguments
    /// address: The bus address of the device.
    /// chip: Which member of the family is fitted.
    /// timer: One-shot timer used for timer-gated conversions.
    ///
    pub async fn setup(
        &mut self,
        address: Address,
        chip: ChipVariant,
        timer: T,
    ) -> Result<(), Error<I2cErr>> {
        let config = read_register(&mut self.i2c, address, Register::Config).await?;
        if config != DEFAULT_CONFIG {
            #[cfg(feature = "defmt")]
            debug!("ads1x15 {=u8:#x}: config {=u16:#x} after reset", address as u8, config);
            return Err(Error::DeviceNotFound);
        }
        self.devices.insert(Device::new(address, chip, timer));
        Ok(())
    }

    /// Writes new settings to the device at `address`.
    ///
    /// Everything is validated before the first register write. Threshold
    /// registers are written before the config register and are not rolled
    /// back if the config write fails.
    pub async fn setting(
        &mut self,
        address: Address,
        settings: Settings,
    ) -> Result<(), Error<I2cErr>> {
        let device = self
            .devices
            .get_mut(address)
            .ok_or(Error::Uninitialized)?;

        let data_rate = settings.sample_rate.register_bits(device.chip)?;
        let calibration =
            threshold::calibrate(settings.gain, settings.channel, settings.comparator)?;

        device.gain = settings.gain;
        device.sample_rate = settings.sample_rate;
        device.mode = settings.mode;
        device.queue = calibration.queue;
        device.comparator_mode = calibration.mode;
        device.thresholds = calibration.thresholds;

        if settings.comparator.is_some() {
            let Thresholds { low, high } = calibration.thresholds;
            #[cfg(feature = "defmt")]
            debug!("ads1x15 {=u8:#x}: thresholds {=i16} {=i16}", address as u8, low, high);
            write_register(&mut self.i2c, address, Register::LoThresh, low as u16).await?;
            write_register(&mut self.i2c, address, Register::HiThresh, high as u16).await?;
        }

        let config = Config {
            start: device.mode == Mode::SingleShot,
            mux: settings.channel,
            gain: device.gain,
            mode: device.mode,
            data_rate,
            comparator_mode: device.comparator_mode,
            queue: device.queue,
        }
        .bits();

        #[cfg(feature = "defmt")]
        debug!("ads1x15 {=u8:#x}: config {=u16:#x}", address as u8, config);
        write_register(&mut self.i2c, address, Register::Config, config).await?;
        device.config = config;
        Ok(())
    }

    /// Starts a conversion on the device at `address`.
    ///
    /// If ALERT/RDY is configured as a conversion-ready output, the conversion
    /// is started and [`Trigger::Started`] returned; `handler` is not used and
    /// completion must be detected on the pin.
    ///
    /// Otherwise `handler` is required. The timer is armed for the conversion
    /// time of the current sample rate and [`Self::on_timer`] delivers the
    /// result. A conversion still pending on this device is cancelled and its
    /// handler dropped without being called.
    pub async fn start_read(
        &mut self,
        address: Address,
        handler: Option<F>,
    ) -> Result<Trigger, Error<I2cErr>> {
        let device = self
            .devices
            .get_mut(address)
            .ok_or(Error::Uninitialized)?;

        if device.signals_ready() {
            let timestamp = scheduler::timestamp(self.clock.now_us());
            if device.mode == Mode::SingleShot {
                write_register(&mut self.i2c, address, Register::Config, device.config).await?;
            }
            return Ok(Trigger::Started { timestamp });
        }

        let handler = handler.ok_or(Error::InvalidArgument(Argument::Handler))?;
        if device.mode == Mode::SingleShot {
            write_register(&mut self.i2c, address, Register::Config, device.config).await?;
        }

        let wait_ms = device.sample_rate.conversion_time_ms();
        device.timer.disarm();
        if device.conversion.begin(handler).is_some() {
            #[cfg(feature = "defmt")]
            debug!("ads1x15 {=u8:#x}: pending conversion cancelled", address as u8);
        }
        device.timer.arm(wait_ms);
        Ok(Trigger::Scheduled { wait_ms })
    }

    /// Completes a timer-gated conversion. Call when the timer of the device
    /// at `address` expires.
    ///
    /// Reads the result, scales it with the device's gain and hands it to the
    /// pending handler. Does nothing if no conversion is pending.
    pub async fn on_timer(&mut self, address: Address) -> Result<(), Error<I2cErr>> {
        let device = self
            .devices
            .get_mut(address)
            .ok_or(Error::Uninitialized)?;

        if !device.conversion.is_waiting() {
            #[cfg(feature = "defmt")]
            debug!("ads1x15 {=u8:#x}: stale timer ignored", address as u8);
            return Ok(());
        }

        let raw = read_conversion(&mut self.i2c, address).await?;
        let reading = Reading::from_raw(device.gain, raw);
        device.timer.disarm();
        if let Some(handler) = device.conversion.finish() {
            handler(reading);
        }
        Ok(())
    }

    /// Reads the conversion register now, scaled with the current gain.
    ///
    /// Leaves any pending conversion alone; the value may be stale or from
    /// an unfinished conversion.
    pub async fn read(&mut self, address: Address) -> Result<Reading, Error<I2cErr>> {
        let gain = self
            .devices
            .get_mut(address)
            .ok_or(Error::Uninitialized)?
            .gain;
        let raw = read_conversion(&mut self.i2c, address).await?;
        Ok(Reading::from_raw(gain, raw))
    }

    /// Reads and decodes the config register of the device at `address`.
    pub async fn read_config(&mut self, address: Address) -> Result<Config, Error<I2cErr>> {
        if self.devices.get_mut(address).is_none() {
            return Err(Error::Uninitialized);
        }
        let bits = read_register(&mut self.i2c, address, Register::Config).await?;
        Ok(Config::from_bits(bits))
    }

    /// Returns true if the device at `address` is idle. Only meaningful in
    /// single-shot mode.
    pub async fn is_ready(&mut self, address: Address) -> Result<bool, Error<I2cErr>> {
        let config = self.read_config(address).await?;
        Ok(config.start)
    }
}

/// Reads the signed conversion result.
async fn read_conversion<I: i2c::I2c>(
    i2c: &mut I,
    address: Address,
) -> Result<i16, Error<I::Error>> {
    let mut buf = [0u8; 2];
    read_into(i2c, address, Register::Conversion, &mut buf).await?;
    Ok(BigEndian::read_i16(&buf))
}

/// Reads a single 16-bit register.
async fn read_register<I: i2c::I2c>(
    i2c: &mut I,
    address: Address,
    reg: Register,
) -> Result<u16, Error<I::Error>> {
    let mut buf = [0u8; 2];
    read_into(i2c, address, reg, &mut buf).await?;
    Ok(BigEndian::read_u16(&buf))
}

/// Sets the pointer register, then reads in a separate transfer.
async fn read_into<I: i2c::I2c>(
    i2c: &mut I,
    address: Address,
    reg: Register,
    buf: &mut [u8; 2],
) -> Result<(), Error<I::Error>> {
    i2c.write(address as u8, &[reg as u8])
        .await
        .map_err(Error::I2c)?;
    i2c.read(address as u8, buf).await.map_err(Error::I2c)
}

/// Writes a 16-bit register, MSB first.
async fn write_register<I: i2c::I2c>(
    i2c: &mut I,
    address: Address,
    reg: Register,
    value: u16,
) -> Result<(), Error<I::Error>> {
    let mut buf = [reg as u8, 0, 0];
    BigEndian::write_u16(&mut buf[1..], value);
    i2c.write(address as u8, &buf).await.map_err(Error::I2c)
}
