// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Conversions between raw register values and temperatures.
//!
//! Temperatures (and the two threshold registers) are 16-bit two's complement numbers with an
//! LSB of 2<sup>-8</sup> ℃ (0.00390625 ℃). In the [extended format][DataFormat::Extended] the
//! same encoding is offset by +64 ℃, which moves the top of the range from just under 128 ℃ to
//! just under 192 ℃.
use num_traits::Float;

use crate::register::DataFormat;

/// The value of one LSB, in ℃.
pub const RESOLUTION: f32 = 0.00390625;

/// The offset applied in the extended data format, in ℃.
pub const EXTENDED_OFFSET: f32 = 64.0;

fn offset(format: DataFormat) -> f32 {
    match format {
        DataFormat::Normal => 0.0,
        DataFormat::Extended => EXTENDED_OFFSET,
    }
}

/// Convert a raw register value to ℃.
/// ```
/// # use max30205::DataFormat;
/// # use max30205::conversion::raw_to_celsius;
/// assert_eq!(raw_to_celsius(0x1900, DataFormat::Normal), 25.0);
/// assert_eq!(raw_to_celsius(0x1900, DataFormat::Extended), 89.0);
/// ```
pub fn raw_to_celsius(raw: i16, format: DataFormat) -> f32 {
    f32::from(raw) * RESOLUTION + offset(format)
}

/// Convert a temperature in ℃ to the closest raw register value.
///
/// Temperatures beyond what the register can hold saturate to `i16::MIN` or `i16::MAX`, and NaN
/// becomes 0.
pub fn celsius_to_raw(celsius: f32, format: DataFormat) -> i16 {
    let scaled = (celsius - offset(format)) / RESOLUTION;
    // `as` saturates for out of range floats.
    Float::round(scaled) as i16
}

/// Interpret two bytes from the sensor as a raw register value.
pub(crate) fn raw_from_bytes(bytes: [u8; 2]) -> i16 {
    i16::from_be_bytes(bytes)
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use super::*;

    const FORMATS: [DataFormat; 2] = [DataFormat::Normal, DataFormat::Extended];

    #[test]
    fn datasheet_examples() {
        assert_approx_eq!(f32, raw_to_celsius(0x1900, DataFormat::Normal), 25.0);
        assert_approx_eq!(f32, raw_to_celsius(0x1900, DataFormat::Extended), 89.0);
        // Negative values
        assert_approx_eq!(f32, raw_to_celsius(-0x0100, DataFormat::Normal), -1.0);
        assert_approx_eq!(f32, raw_to_celsius(-0x4000, DataFormat::Extended), 0.0);
        // Extremes
        assert_approx_eq!(f32, raw_to_celsius(i16::MAX, DataFormat::Normal), 127.99609375);
        assert_approx_eq!(f32, raw_to_celsius(i16::MIN, DataFormat::Normal), -128.0);
    }

    #[test]
    fn to_raw() {
        assert_eq!(celsius_to_raw(25.0, DataFormat::Normal), 0x1900);
        assert_eq!(celsius_to_raw(89.0, DataFormat::Extended), 0x1900);
        assert_eq!(celsius_to_raw(35.0, DataFormat::Normal), 0x2300);
        assert_eq!(celsius_to_raw(39.0, DataFormat::Normal), 0x2700);
        assert_eq!(celsius_to_raw(0.0, DataFormat::Extended), -0x4000);
    }

    #[test]
    fn to_raw_rounds() {
        // Just under and just over half an LSB
        assert_eq!(celsius_to_raw(RESOLUTION * 0.49, DataFormat::Normal), 0);
        assert_eq!(celsius_to_raw(RESOLUTION * 0.51, DataFormat::Normal), 1);
        assert_eq!(celsius_to_raw(-RESOLUTION * 0.51, DataFormat::Normal), -1);
    }

    #[test]
    fn to_raw_saturates() {
        assert_eq!(celsius_to_raw(1000.0, DataFormat::Normal), i16::MAX);
        assert_eq!(celsius_to_raw(-1000.0, DataFormat::Normal), i16::MIN);
        assert_eq!(celsius_to_raw(f32::NAN, DataFormat::Normal), 0);
    }

    #[test]
    fn round_trip_within_one_lsb() {
        for format in FORMATS {
            let start = match format {
                DataFormat::Normal => -127.0f32,
                DataFormat::Extended => -63.0f32,
            };
            // Walk the representable range in odd-sized steps so most values aren't exact.
            let mut celsius = start;
            while celsius < start + 254.0 {
                let raw = celsius_to_raw(celsius, format);
                let back = raw_to_celsius(raw, format);
                assert!(
                    (back - celsius).abs() <= RESOLUTION,
                    "{:?}: {} became {} ({:#06x})",
                    format,
                    celsius,
                    back,
                    raw
                );
                celsius += 0.0137;
            }
        }
    }

    #[test]
    fn big_endian() {
        assert_eq!(raw_from_bytes([0x19, 0x00]), 0x1900);
        assert_eq!(raw_from_bytes([0xFF, 0x00]), -0x0100);
    }
}
