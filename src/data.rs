/*
 * Filename: data.rs
 * Description: modules for holding data from the sensor.
 */

use crc_any::CRCu8;

/// CRC-8 parameters from the Sensirion datasheet: x^8 + x^5 + x^4 + 1, init 0xFF.
pub const CRC_POLYNOMIAL: u8 = 0x31;
pub const CRC_INIT: u8 = 0xFF;

/// Full scale of a raw 16-bit reading.
pub const MAGIC: f32 = 65535.0;

pub const FRAME_LEN: usize = 6;

/// 8-bit CRC over `bytes`, no reflection and no final xor.
pub fn crc8(bytes: &[u8], polynomial: u8, init: u8) -> u8 {
    let mut crc = CRCu8::create_crc(polynomial, 8, init, 0x00, false);
    crc.digest(bytes);
    crc.get_crc()
}

fn sensor_crc(bytes: &[u8]) -> u8 {
    crc8(bytes, CRC_POLYNOMIAL, CRC_INIT)
}

/// The 6 bytes the sensor sends back: two groups of `[msb, lsb, crc]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorData {
    pub bytes: [u8; FRAME_LEN],
}

impl SensorData {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        SensorData { bytes }
    }

    /// The two checksum bytes as received.
    pub fn crc(&self) -> [u8; 2] {
        [self.bytes[2], self.bytes[5]]
    }

    /// The two checksums recomputed over each group's data bytes.
    pub fn computed_crc(&self) -> [u8; 2] {
        [sensor_crc(&self.bytes[0..2]), sensor_crc(&self.bytes[3..5])]
    }

    /// Compares both checksums. On mismatch returns `(computed, received)`.
    pub fn check_crc(&self) -> Result<(), ([u8; 2], [u8; 2])> {
        let computed = self.computed_crc();
        let received = self.crc();
        if computed != received {
            return Err((computed, received));
        }
        Ok(())
    }

    /// The two big-endian data words, checksums dropped.
    pub fn words(&self) -> (u16, u16) {
        let first = u16::from_be_bytes([self.bytes[0], self.bytes[1]]);
        let second = u16::from_be_bytes([self.bytes[3], self.bytes[4]]);
        (first, second)
    }

    pub fn raw_measurement(&self) -> RawMeasurement {
        let (temperature, humidity) = self.words();
        RawMeasurement { temperature, humidity }
    }
}

/// Undecoded temperature and humidity codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeasurement {
    pub temperature: u16,
    pub humidity: u16,
}

impl RawMeasurement {
    pub fn to_measurement(&self) -> Measurement {
        Measurement {
            temperature: convert_temperature(self.temperature),
            humidity: convert_humidity(self.humidity),
        }
    }
}

/// Temperature in °C and relative humidity in %.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub temperature: f32,
    pub humidity: f32,
}

impl Measurement {
    /// The humidity formula can land slightly outside 0..100, the datasheet
    /// leaves clipping to the caller.
    pub fn humidity_clamped(&self) -> f32 {
        self.humidity.clamp(0.0, 100.0)
    }
}

pub fn convert_temperature(raw: u16) -> f32 {
    175.0 * raw as f32 / MAGIC - 45.0
}

pub fn convert_humidity(raw: u16) -> f32 {
    125.0 * raw as f32 / MAGIC - 6.0
}


#[cfg(test)]
mod sensor_data_tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn crc() {
        // Example from the Sensirion interface specification.
        assert_eq!(crc8(&[0xBE, 0xEF], CRC_POLYNOMIAL, CRC_INIT), 0x92);
        assert_eq!(crc8(&[0x00, 0x00], CRC_POLYNOMIAL, CRC_INIT), 0x81);
        assert_ne!(crc8(&[0xFF, 0xFF], CRC_POLYNOMIAL, CRC_INIT), 0x92);
    }

    #[test]
    fn crc_parameters() {
        //Changing either parameter has to change the result.
        assert_ne!(crc8(&[0xBE, 0xEF], 0x07, CRC_INIT), 0x92);
        assert_ne!(crc8(&[0xBE, 0xEF], CRC_POLYNOMIAL, 0x00), 0x92);
    }

    #[test]
    fn crc_check() {
        let data = SensorData::new([0x63, 0x2A, 0xA4, 0x5E, 0x1C, 0x35]);
        assert_eq!(data.crc(), [0xA4, 0x35]);
        assert!(data.check_crc().is_ok());

        let bad = SensorData::new([0x63, 0x2A, 0xA5, 0x5E, 0x1C, 0x35]);
        assert_eq!(bad.check_crc(), Err(([0xA4, 0x35], [0xA5, 0x35])));
    }

    #[test]
    fn crc_single_bit_flips() {
        for group in [[0xBEu8, 0xEF], [0x00, 0x00], [0x63, 0x2A], [0xFF, 0xFF]] {
            let crc = crc8(&group, CRC_POLYNOMIAL, CRC_INIT);
            let good = [group[0], group[1], crc, 0xBE, 0xEF, 0x92];
            assert!(SensorData::new(good).check_crc().is_ok());

            //Every single bit error in the first group has to be caught.
            for byte in 0..3 {
                for bit in 0..8 {
                    let mut flipped = good;
                    flipped[byte] ^= 1 << bit;
                    assert!(SensorData::new(flipped).check_crc().is_err());
                }
            }
        }
    }

    #[test]
    fn words() {
        let data = SensorData::new([0x0A, 0x1B, 0xC6, 0x2C, 0x3D, 0x60]);
        assert_eq!(data.words(), (0x0A1B, 0x2C3D));
        assert_eq!(
            data.raw_measurement(),
            RawMeasurement { temperature: 0x0A1B, humidity: 0x2C3D }
        );
    }

    #[test]
    fn convert_bounds() {
        assert_eq!(convert_temperature(0), -45.0);
        assert_eq!(convert_humidity(0), -6.0);

        assert!(close(convert_temperature(u16::MAX), 130.0));
        assert!(close(convert_humidity(u16::MAX), 119.0));
    }

    #[test]
    fn convert_midpoint() {
        assert!(close(convert_temperature(32767), 42.5));
        assert!(close(convert_temperature(32768), 42.5));
        assert!(close(convert_humidity(32767), 56.5));
        assert!(close(convert_humidity(32768), 56.5));

        //0x6666 is exactly 25C.
        assert!(close(convert_temperature(0x6666), 25.0));
    }

    #[test]
    fn humidity_is_not_clamped() {
        let m = RawMeasurement { temperature: 0, humidity: u16::MAX }.to_measurement();
        assert!(m.humidity > 100.0);
        assert_eq!(m.humidity_clamped(), 100.0);

        let m = RawMeasurement { temperature: 0, humidity: 0 }.to_measurement();
        assert_eq!(m.humidity, -6.0);
        assert_eq!(m.humidity_clamped(), 0.0);
    }
}
