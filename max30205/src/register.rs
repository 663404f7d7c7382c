// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Register map and the configuration register bit fields.
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::LibraryError;
use crate::util::{is_bit_set, with_bit};

/// The four registers of the MAX30205, as addressed by the register pointer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Register {
    /// Temperature, two bytes, read-only.
    Temperature = 0x00,

    /// Configuration, one byte.
    Configuration = 0x01,

    /// Hysteresis (T<sub>HYST</sub>), two bytes. Used as the low interrupt threshold.
    Hysteresis = 0x02,

    /// Overtemperature shutdown (T<sub>OS</sub>), two bytes. Used as the high interrupt
    /// threshold.
    Overtemperature = 0x03,
}

const SHUTDOWN_BIT: usize = 0;
const INTERRUPT_MODE_BIT: usize = 1;
const POLARITY_BIT: usize = 2;
const FAULT_QUEUE_SHIFT: u8 = 3;
const FAULT_QUEUE_MASK: u8 = 0b0001_1000;
const DATA_FORMAT_BIT: usize = 5;
const TIMEOUT_BIT: usize = 6;
const ONE_SHOT_BIT: usize = 7;

/// The configuration register (0x01).
///
/// The driver keeps one of these as a shadow of the sensor's register. Changing a field only
/// changes the shadow; the value is sent to the sensor by the read sequencing operations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ConfigurationRegister(u8);

impl ConfigurationRegister {
    /// Whether the sensor is (or should be) in shutdown.
    pub fn shutdown(&self) -> bool {
        is_bit_set(self.0, SHUTDOWN_BIT)
    }

    pub fn set_shutdown(&mut self, shutdown: bool) {
        self.0 = with_bit(self.0, SHUTDOWN_BIT, shutdown);
    }

    pub fn interrupt_mode(&self) -> InterruptMode {
        if is_bit_set(self.0, INTERRUPT_MODE_BIT) {
            InterruptMode::Interrupt
        } else {
            InterruptMode::Comparator
        }
    }

    pub fn set_interrupt_mode(&mut self, mode: InterruptMode) {
        self.0 = with_bit(self.0, INTERRUPT_MODE_BIT, mode == InterruptMode::Interrupt);
    }

    pub fn pin_polarity(&self) -> PinPolarity {
        if is_bit_set(self.0, POLARITY_BIT) {
            PinPolarity::High
        } else {
            PinPolarity::Low
        }
    }

    pub fn set_pin_polarity(&mut self, polarity: PinPolarity) {
        self.0 = with_bit(self.0, POLARITY_BIT, polarity == PinPolarity::High);
    }

    pub fn fault_queue(&self) -> FaultQueue {
        // Unwrap: two bits can only hold 0 through 3, and every one of them is a FaultQueue.
        FaultQueue::try_from_primitive((self.0 & FAULT_QUEUE_MASK) >> FAULT_QUEUE_SHIFT).unwrap()
    }

    pub fn set_fault_queue(&mut self, fault_queue: FaultQueue) {
        let raw: u8 = fault_queue.into();
        self.0 = (self.0 & !FAULT_QUEUE_MASK) | (raw << FAULT_QUEUE_SHIFT);
    }

    pub fn data_format(&self) -> DataFormat {
        if is_bit_set(self.0, DATA_FORMAT_BIT) {
            DataFormat::Extended
        } else {
            DataFormat::Normal
        }
    }

    pub fn set_data_format(&mut self, format: DataFormat) {
        self.0 = with_bit(self.0, DATA_FORMAT_BIT, format == DataFormat::Extended);
    }

    pub fn bus_timeout(&self) -> BusTimeout {
        // The register bit is a "disable" flag.
        if is_bit_set(self.0, TIMEOUT_BIT) {
            BusTimeout::Disabled
        } else {
            BusTimeout::Enabled
        }
    }

    pub fn set_bus_timeout(&mut self, timeout: BusTimeout) {
        self.0 = with_bit(self.0, TIMEOUT_BIT, timeout == BusTimeout::Disabled);
    }

    /// The one-shot bit.
    pub fn one_shot(&self) -> bool {
        is_bit_set(self.0, ONE_SHOT_BIT)
    }

    pub fn set_one_shot(&mut self, one_shot: bool) {
        self.0 = with_bit(self.0, ONE_SHOT_BIT, one_shot);
    }

    /// The value to write when resuming continuous conversions: shutdown and one-shot cleared.
    pub(crate) fn continuous(self) -> Self {
        let mut register = self;
        register.set_shutdown(false);
        register.set_one_shot(false);
        register
    }

    /// The value to write when entering shutdown with a conversion requested: shutdown and
    /// one-shot set.
    pub(crate) fn shutdown_one_shot(self) -> Self {
        let mut register = self;
        register.set_shutdown(true);
        register.set_one_shot(true);
        register
    }

    /// The value to write to only power down. The one-shot bit is left as-is.
    pub(crate) fn powered_down(self) -> Self {
        let mut register = self;
        register.set_shutdown(true);
        register
    }
}

impl From<u8> for ConfigurationRegister {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<ConfigurationRegister> for u8 {
    fn from(register: ConfigurationRegister) -> Self {
        register.0
    }
}

/// Temperature data format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DataFormat {
    /// Two's complement, 0x0000 is 0 ℃. The default.
    Normal = 0,

    /// Two's complement with a +64 ℃ offset, for measuring above 128 ℃.
    Extended = 1,
}

impl Default for DataFormat {
    fn default() -> Self {
        Self::Normal
    }
}

/// How the OS pin behaves once the overtemperature threshold is crossed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum InterruptMode {
    /// OS asserts while the temperature is above T<sub>OS</sub>, and deasserts once it drops below
    /// T<sub>HYST</sub>. The default.
    Comparator = 0,

    /// OS asserts on a threshold crossing and stays asserted until any register is read.
    Interrupt = 1,
}

impl Default for InterruptMode {
    fn default() -> Self {
        Self::Comparator
    }
}

/// Active level of the OS pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PinPolarity {
    /// Active low, the default.
    Low = 0,

    High = 1,
}

impl Default for PinPolarity {
    fn default() -> Self {
        Self::Low
    }
}

/// Number of consecutive faulty conversions needed to assert the OS pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FaultQueue {
    One = 0,
    Two = 1,
    Four = 2,
    Six = 3,
}

impl FaultQueue {
    /// The number of faults this setting waits for.
    pub fn faults(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Six => 6,
        }
    }

    /// Attempt to create a `FaultQueue` from a number of faults.
    pub fn from_faults(faults: u8) -> Result<Self, LibraryError> {
        match faults {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            6 => Ok(Self::Six),
            _ => Err(LibraryError::InvalidData(
                "The fault queue can only be 1, 2, 4 or 6 faults deep",
            )),
        }
    }
}

impl Default for FaultQueue {
    fn default() -> Self {
        Self::One
    }
}

/// SMBus timeout, which resets the interface if SDA is held low for too long.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BusTimeout {
    /// Enabled, the default.
    Enabled = 0,

    Disabled = 1,
}

impl Default for BusTimeout {
    fn default() -> Self {
        Self::Enabled
    }
}
