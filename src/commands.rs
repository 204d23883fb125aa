//We have sepreate consts and enums for the puporse of being used during
//testing(consts) or as parameters(enum).
pub const GET_IDENTIFIER: u8 = 0x89;
pub const SOFT_RESET: u8 = 0x94;

pub const MEASURE_LOW: u8 = 0xE0;
pub const MEASURE_MEDIUM: u8 = 0xF6;
pub const MEASURE_HIGH: u8 = 0xFD;

pub const HEATER_LOW_SHORT: u8 = 0x15;
pub const HEATER_LOW_LONG: u8 = 0x1E;
pub const HEATER_MEDIUM_SHORT: u8 = 0x24;
pub const HEATER_MEDIUM_LONG: u8 = 0x2F;
pub const HEATER_HIGH_SHORT: u8 = 0x32;
pub const HEATER_HIGH_LONG: u8 = 0x39;

/// Conversion times in microseconds, taken from the datasheet maximums.
pub const CONVERSION_LOW_US: u32 = 1_600;
pub const CONVERSION_MEDIUM_US: u32 = 4_500;
pub const CONVERSION_HIGH_US: u32 = 8_300;
pub const HEATER_SHORT_US: u32 = 110_000;
pub const HEATER_LONG_US: u32 = 1_100_000;

/// Every command the SHT4x understands. The discriminant is the byte on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    GetIdentifier = GET_IDENTIFIER,
    SoftReset = SOFT_RESET,
    MeasureLow = MEASURE_LOW,
    MeasureMedium = MEASURE_MEDIUM,
    MeasureHigh = MEASURE_HIGH,
    HeaterLowShort = HEATER_LOW_SHORT,
    HeaterLowLong = HEATER_LOW_LONG,
    HeaterMediumShort = HEATER_MEDIUM_SHORT,
    HeaterMediumLong = HEATER_MEDIUM_LONG,
    HeaterHighShort = HEATER_HIGH_SHORT,
    HeaterHighLong = HEATER_HIGH_LONG,
}

impl Command {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up the measurement command for a mode.
    pub fn measure(mode: MeasurementMode) -> Command {
        use HeaterPower as P;
        use HeaterPulse as D;

        match mode {
            MeasurementMode::Plain(Repeatability::Low) => Command::MeasureLow,
            MeasurementMode::Plain(Repeatability::Medium) => Command::MeasureMedium,
            MeasurementMode::Plain(Repeatability::High) => Command::MeasureHigh,
            MeasurementMode::Heated { power: P::Low, pulse: D::Short } => Command::HeaterLowShort,
            MeasurementMode::Heated { power: P::Low, pulse: D::Long } => Command::HeaterLowLong,
            MeasurementMode::Heated { power: P::Medium, pulse: D::Short } => {
                Command::HeaterMediumShort
            }
            MeasurementMode::Heated { power: P::Medium, pulse: D::Long } => {
                Command::HeaterMediumLong
            }
            MeasurementMode::Heated { power: P::High, pulse: D::Short } => Command::HeaterHighShort,
            MeasurementMode::Heated { power: P::High, pulse: D::Long } => Command::HeaterHighLong,
        }
    }

    pub fn from_code(code: u8) -> Option<Command> {
        let cmd = match code {
            GET_IDENTIFIER => Command::GetIdentifier,
            SOFT_RESET => Command::SoftReset,
            MEASURE_LOW => Command::MeasureLow,
            MEASURE_MEDIUM => Command::MeasureMedium,
            MEASURE_HIGH => Command::MeasureHigh,
            HEATER_LOW_SHORT => Command::HeaterLowShort,
            HEATER_LOW_LONG => Command::HeaterLowLong,
            HEATER_MEDIUM_SHORT => Command::HeaterMediumShort,
            HEATER_MEDIUM_LONG => Command::HeaterMediumLong,
            HEATER_HIGH_SHORT => Command::HeaterHighShort,
            HEATER_HIGH_LONG => Command::HeaterHighLong,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Repeatability of a measurement without the heater.
/// Level 0 is the fastest and noisiest, level 2 the slowest and most precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeatability {
    Low,
    Medium,
    High,
}

/// Heater power, typically 20mW, 110mW and 200mW at 3.3V.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaterPower {
    Low,
    Medium,
    High,
}

/// How long the heater stays on: ~0.1s or ~1.0s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaterPulse {
    Short,
    Long,
}

/// The parameters of a single one-shot measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    Plain(Repeatability),
    Heated { power: HeaterPower, pulse: HeaterPulse },
}

impl MeasurementMode {
    /// Builds a mode from the untyped parameters. `level` is the repeatability
    /// without the heater and the heater power with it; `long_pulse` only
    /// matters when the heater is on.
    ///
    /// Returns `None` when `level` is outside `0..=2`.
    pub fn from_parameters(with_heater: bool, level: u8, long_pulse: bool) -> Option<Self> {
        if with_heater {
            let power = match level {
                0 => HeaterPower::Low,
                1 => HeaterPower::Medium,
                2 => HeaterPower::High,
                _ => return None,
            };
            let pulse = if long_pulse { HeaterPulse::Long } else { HeaterPulse::Short };
            return Some(MeasurementMode::Heated { power, pulse });
        }

        let repeatability = match level {
            0 => Repeatability::Low,
            1 => Repeatability::Medium,
            2 => Repeatability::High,
            _ => return None,
        };
        Some(MeasurementMode::Plain(repeatability))
    }

    /// Minimum time in microseconds before the result frame can be read.
    pub fn conversion_time_us(&self) -> u32 {
        match self {
            MeasurementMode::Plain(Repeatability::Low) => CONVERSION_LOW_US,
            MeasurementMode::Plain(Repeatability::Medium) => CONVERSION_MEDIUM_US,
            MeasurementMode::Plain(Repeatability::High) => CONVERSION_HIGH_US,
            MeasurementMode::Heated { pulse: HeaterPulse::Short, .. } => HEATER_SHORT_US,
            MeasurementMode::Heated { pulse: HeaterPulse::Long, .. } => HEATER_LONG_US,
        }
    }

    pub fn with_heater(&self) -> bool {
        matches!(self, MeasurementMode::Heated { .. })
    }
}

impl Default for MeasurementMode {
    fn default() -> Self {
        MeasurementMode::Plain(Repeatability::High)
    }
}
