// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! The bus capability the driver is built on.
#[cfg(feature = "std")]
extern crate std;

use core::fmt;

use arrayvec::ArrayVec;
use embedded_hal::blocking::i2c;

/// The longest payload [`I2cInterface`] can send in one write, not counting the register pointer.
///
/// The register pointer and payload are assembled in a stack buffer before going out as a
/// single transaction, and this is the size of that buffer.
pub const MAX_WRITE_LENGTH: usize = 32;

/// Byte-level register access to a device, plus bus bring-up and teardown.
///
/// Most users will want [`I2cInterface`], which implements this for any `embedded-hal` I²C bus.
/// Implement it directly when the bus needs work done when the sensor is initialized or
/// deinitialized (powering a bus switch, for example).
pub trait Interface {
    type Error;

    /// Called from [`Max30205::init`][crate::Max30205::init].
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called from [`Max30205::deinit`][crate::Max30205::deinit].
    fn deinit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Read `buffer.len()` bytes starting at `register`.
    fn read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `register`.
    fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Errors from [`I2cInterface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum I2cInterfaceError<E> {
    /// The underlying bus reported an error.
    Bus(E),

    /// The payload (of the given length) is longer than [`MAX_WRITE_LENGTH`]. Nothing was sent.
    PayloadTooLong(usize),
}

impl<E> fmt::Display for I2cInterfaceError<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cInterfaceError::Bus(bus_error) => write!(f, "{:?}", bus_error),
            I2cInterfaceError::PayloadTooLong(length) => write!(
                f,
                "a {} byte payload is longer than the {} byte write buffer",
                length, MAX_WRITE_LENGTH
            ),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for I2cInterfaceError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            I2cInterfaceError::Bus(bus_error) => Some(bus_error),
            I2cInterfaceError::PayloadTooLong(_) => None,
        }
    }
}

/// [`Interface`] over an `embedded-hal` blocking I²C bus.
#[derive(Clone, Debug)]
pub struct I2cInterface<I2C> {
    bus: I2C,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self { bus }
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.bus
    }
}

impl<I2C, E> Interface for I2cInterface<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>,
{
    type Error = I2cInterfaceError<E>;

    fn read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bus
            .write_read(address, &[register], buffer)
            .map_err(I2cInterfaceError::Bus)
    }

    /// Payloads longer than [`MAX_WRITE_LENGTH`] are rejected with
    /// [`I2cInterfaceError::PayloadTooLong`] before anything is sent.
    fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        // The register pointer and the payload go out in the same transaction.
        let mut combined: ArrayVec<u8, { MAX_WRITE_LENGTH + 1 }> = ArrayVec::new();
        combined.push(register);
        combined
            .try_extend_from_slice(data)
            .map_err(|_| I2cInterfaceError::PayloadTooLong(data.len()))?;
        self.bus
            .write(address, &combined)
            .map_err(I2cInterfaceError::Bus)
    }
}
