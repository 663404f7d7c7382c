// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
use crate::register::{BusTimeout, DataFormat, FaultQueue, InterruptMode, PinPolarity};

/// A complete sensor configuration, as applied by [`Max30205::apply`][crate::Max30205::apply].
///
/// The thresholds are temperatures in ℃, converted with `data_format` when applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub data_format: DataFormat,
    pub interrupt_mode: InterruptMode,
    pub fault_queue: FaultQueue,
    pub pin_polarity: PinPolarity,
    pub bus_timeout: BusTimeout,
    /// T<sub>HYST</sub>
    pub low_threshold: f32,
    /// T<sub>OS</sub>
    pub high_threshold: f32,
}

impl Settings {
    /// Settings for watching the OS pin, with a deeper fault queue to ride out noise.
    pub fn interrupt(
        interrupt_mode: InterruptMode,
        low_threshold: f32,
        high_threshold: f32,
    ) -> Self {
        Self {
            interrupt_mode,
            fault_queue: FaultQueue::Two,
            low_threshold,
            high_threshold,
            ..Self::default()
        }
    }
}

impl Default for Settings {
    /// Normal format, comparator mode, a single fault, active-low OS, bus timeout disabled, and
    /// thresholds of 35 ℃ and 39 ℃.
    fn default() -> Self {
        Self {
            data_format: DataFormat::Normal,
            interrupt_mode: InterruptMode::Comparator,
            fault_queue: FaultQueue::One,
            pin_polarity: PinPolarity::Low,
            bus_timeout: BusTimeout::Disabled,
            low_threshold: 35.0,
            high_threshold: 39.0,
        }
    }
}
