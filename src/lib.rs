#![cfg_attr(not(test), no_std)]
//! Driver for the Sensirion SHT4x humidity and temperature sensors.
//!
//! The SHT4x only does one-shot measurements. Each one is a command byte,
//! a wait, then a 6 byte frame holding two `[msb, lsb, crc]` groups:
//!
//! ```
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! use sensor_lib_sht4x::{Config, Sensor, SENSOR_ADDR};
//!
//! let expectations = [
//!     I2cTransaction::write(SENSOR_ADDR, vec![0xFD]),
//!     I2cTransaction::read(SENSOR_ADDR, vec![0x63, 0x2A, 0xA4, 0x5E, 0x1C, 0x35]),
//! ];
//! let i2c = I2cMock::new(&expectations);
//! let mut sensor = Sensor::new(i2c, Config::default()).unwrap();
//!
//! sensor.start_measurement(false, 2, false).unwrap();
//! let wait_us = sensor.get_conversion_cycle_time().unwrap();
//! NoopDelay::new().delay_us(wait_us);
//!
//! let measurement = sensor.get_measurement_value().unwrap().unwrap();
//! assert!((measurement.temperature - 22.79).abs() < 0.01);
//! assert!((measurement.humidity - 39.95).abs() < 0.01);
//!
//! let mut i2c = sensor.release();
//! i2c.done();
//! ```
//!
//! The driver holds the last command sent and is not meant to be shared
//! between threads without external locking.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c;

//Import the sensor's availble i2c commands and measurement modes
pub mod commands;
pub use crate::commands::{Command, HeaterPower, HeaterPulse, MeasurementMode, Repeatability};

mod data;
pub use crate::data::{
    convert_humidity, convert_temperature, crc8, Measurement, RawMeasurement, SensorData,
    CRC_INIT, CRC_POLYNOMIAL, FRAME_LEN,
};

mod sensor_state;
pub use crate::sensor_state::SensorState;


/// SHT4x-A address, the most common part.
pub const SENSOR_ADDR: u8 = 0x44;
/// SHT4x-B address.
pub const SENSOR_ADDR_B: u8 = 0x45;
/// SHT4x-C address.
pub const SENSOR_ADDR_C: u8 = 0x46;

/// The sensor needs this long after the identifier command before it can answer.
pub const IDENTIFIER_DELAY_US: u32 = 110;


//Impliment Error type for our driver.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    I2C(E),
    /// Address outside `0x44..=0x46`.
    InvalidAddress(u8),
    /// Repeatability or heater level outside `0..=2`.
    InvalidLevel(u8),
    /// A frame failed its checksum check.
    InvalidChecksum { computed: [u8; 2], received: [u8; 2] },
    /// Timing or results were asked for without a command that produces them.
    InvalidState,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2C(e) => write!(f, "i2c error: {:?}", e),
            Error::InvalidAddress(addr) => write!(f, "invalid device address: {:#04x}", addr),
            Error::InvalidLevel(level) => write!(f, "invalid level: {}", level),
            Error::InvalidChecksum { computed, received } => write!(
                f,
                "invalid crc, computed {:02x?} received {:02x?}",
                computed, received
            ),
            Error::InvalidState => write!(f, "no matching command was sent"),
        }
    }
}


/// Construction time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub address: u8,
    /// Validate both checksums of every frame.
    pub check_crc: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { address: SENSOR_ADDR, check_crc: true }
    }
}


pub struct Sensor<I2C>
where I2C: i2c::I2c
{
    i2c: I2C,
    address: u8,
    check_crc: bool,
    state: SensorState,
}

//Impliment functions for the sensor that require the embedded-hal
//I2C.
impl<E, I2C> Sensor<I2C>
where I2C: i2c::I2c<Error = E>
{
    /// Creates the driver. No bus traffic happens here.
    pub fn new(i2c: I2C, config: Config) -> Result<Self, Error<E>> {
        if !(SENSOR_ADDR..=SENSOR_ADDR_C).contains(&config.address) {
            return Err(Error::InvalidAddress(config.address));
        }

        Ok(Sensor {
            i2c,
            address: config.address,
            check_crc: config.check_crc,
            state: SensorState::Idle,
        })
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    /// The last command that went out on the bus, if any.
    pub fn last_command(&self) -> Option<Command> {
        self.state.command()
    }

    /// Always true, every measurement is started by `start_measurement`.
    pub fn is_single_shot_mode(&self) -> bool {
        true
    }

    /// The SHT4x has no free running mode.
    pub fn is_continuous_mode(&self) -> bool {
        false
    }


    fn send_command(&mut self, cmd: Command, next: SensorState) -> Result<(), Error<E>> {
        self.i2c
            .write(self.address, &[cmd.code()])
            .map_err(Error::I2C)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("sht4x: sent {=u8:#x}", cmd.code());

        self.state = next;
        Ok(())
    }

    /// Reads the answer to the last command.
    ///
    /// Returns `None` after a soft reset, the sensor has nothing to send.
    pub fn read_frame(&mut self) -> Result<Option<SensorData>, Error<E>> {
        match self.state {
            SensorState::Idle => return Err(Error::InvalidState),
            SensorState::AwaitingReset => return Ok(None),
            SensorState::AwaitingIdentifier | SensorState::AwaitingMeasurement(_) => {}
        }

        let mut buf = [0u8; FRAME_LEN];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(Error::I2C)?;

        let data = SensorData::new(buf);
        if self.check_crc {
            if let Err((computed, received)) = data.check_crc() {
                #[cfg(feature = "defmt")]
                defmt::warn!("sht4x: crc mismatch, computed {} received {}", computed, received);

                return Err(Error::InvalidChecksum { computed, received });
            }
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("sht4x: read {}", data.bytes);

        Ok(Some(data))
    }

    /// Reads the two halves of the serial number.
    pub fn get_identifier(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(u16, u16), Error<E>> {
        self.send_command(Command::GetIdentifier, SensorState::AwaitingIdentifier)?;

        //the sensor can't answer right away.
        delay.delay_us(IDENTIFIER_DELAY_US);

        let data = self.read_frame()?.ok_or(Error::InvalidState)?;
        Ok(data.words())
    }

    /// Sends the soft reset. The datasheet asks for about 1ms before the
    /// next command, that wait is up to the caller.
    pub fn soft_reset(&mut self) -> Result<(), Error<E>> {
        self.send_command(Command::SoftReset, SensorState::AwaitingReset)
    }

    /// Starts a measurement from the untyped parameters.
    ///
    /// `level` is the repeatability without the heater and the heater power
    /// with it, both `0..=2`. `long_pulse` picks the 1s heater pulse over the
    /// 0.1s one and is ignored without the heater.
    pub fn start_measurement(
        &mut self,
        with_heater: bool,
        level: u8,
        long_pulse: bool,
    ) -> Result<(), Error<E>> {
        let mode = MeasurementMode::from_parameters(with_heater, level, long_pulse)
            .ok_or(Error::InvalidLevel(level))?;
        self.start(mode)
    }

    pub fn start(&mut self, mode: MeasurementMode) -> Result<(), Error<E>> {
        self.send_command(Command::measure(mode), SensorState::AwaitingMeasurement(mode))
    }

    /// Microseconds to wait after `start_measurement` before reading.
    pub fn get_conversion_cycle_time(&self) -> Result<u32, Error<E>> {
        match self.state {
            SensorState::AwaitingMeasurement(mode) => Ok(mode.conversion_time_us()),
            _ => Err(Error::InvalidState),
        }
    }

    /// Reads the last measurement without converting it.
    ///
    /// Returns `None` after an identifier request or a soft reset.
    pub fn get_raw_measurement_value(&mut self) -> Result<Option<RawMeasurement>, Error<E>> {
        match self.state {
            SensorState::Idle => Err(Error::InvalidState),
            SensorState::AwaitingIdentifier | SensorState::AwaitingReset => Ok(None),
            SensorState::AwaitingMeasurement(_) => {
                let data = self.read_frame()?;
                Ok(data.map(|d| d.raw_measurement()))
            }
        }
    }

    /// Reads the last measurement in °C and %RH.
    ///
    /// Returns `None` after an identifier request or a soft reset.
    pub fn get_measurement_value(&mut self) -> Result<Option<Measurement>, Error<E>> {
        let raw = self.get_raw_measurement_value()?;
        Ok(raw.map(|r| r.to_measurement()))
    }

    /// Starts a measurement, blocks for the conversion time and reads it.
    pub fn measure(
        &mut self,
        delay: &mut impl DelayNs,
        mode: MeasurementMode,
    ) -> Result<Measurement, Error<E>> {
        self.start(mode)?;
        delay.delay_us(mode.conversion_time_us());

        self.get_measurement_value()?.ok_or(Error::InvalidState)
    }
}
