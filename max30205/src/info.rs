// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross

/// Fixed facts about the chip and this driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChipInfo {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    /// Minimum supply voltage, in volts.
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage, in volts.
    pub supply_voltage_max_v: f32,
    /// Maximum supply current, in milliamps.
    pub max_current_ma: f32,
    /// Lowest temperature the accuracy is specified for, in ℃.
    pub temperature_min: f32,
    /// Highest temperature the accuracy is specified for, in ℃.
    pub temperature_max: f32,
    /// Driver version, as `major * 1000 + minor * 100`.
    pub driver_version: u32,
}

impl ChipInfo {
    pub fn driver_version_major(&self) -> u32 {
        self.driver_version / 1000
    }

    pub fn driver_version_minor(&self) -> u32 {
        (self.driver_version % 1000) / 100
    }
}

pub const INFO: ChipInfo = ChipInfo {
    chip_name: "Maxim Integrated MAX30205",
    manufacturer_name: "Maxim Integrated",
    interface: "IIC",
    supply_voltage_min_v: 2.7,
    supply_voltage_max_v: 3.3,
    max_current_ma: 20.0,
    temperature_min: 0.0,
    temperature_max: 50.0,
    driver_version: 2000,
};

/// Information about the MAX30205. No sensor is needed.
pub fn info() -> ChipInfo {
    INFO
}

#[cfg(test)]
mod test {
    use super::info;

    #[test]
    fn version() {
        let info = info();
        assert_eq!(info.driver_version_major(), 2);
        assert_eq!(info.driver_version_minor(), 0);
        assert_eq!(info.interface, "IIC");
        assert!(info.supply_voltage_min_v < info.supply_voltage_max_v);
    }
}
