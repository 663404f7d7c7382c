// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
#[cfg(feature = "std")]
extern crate std;

use core::fmt;

use crate::interface::Interface;

/// Errors that don't involve the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryError {
    /// The operation needs [`init`][crate::Max30205::init] to have been called first.
    NotInitialized,

    /// A value given to (or received from) the sensor is malformed in some way.
    InvalidData(&'static str),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::NotInitialized => write!(f, "the sensor has not been initialized"),
            LibraryError::InvalidData(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LibraryError {}

#[derive(Clone, PartialEq)]
pub enum Error<I>
where
    I: Interface,
{
    /// Errors originating from the bus interface (including bus init and deinit).
    BusError(I::Error),

    /// Errors originating from within this library.
    LibraryError(LibraryError),
}

// Custom Debug implementation so that I doesn't need to implement Debug (like the ones from
// linux-embedded-hal).
impl<I> fmt::Debug for Error<I>
where
    I: Interface,
    I::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BusError(bus_error) => f.debug_tuple("Error::BusError").field(bus_error).finish(),
            Error::LibraryError(err) => f.debug_tuple("Error::LibraryError").field(err).finish(),
        }
    }
}

impl<I> fmt::Display for Error<I>
where
    I: Interface,
    I::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BusError(bus_error) => write!(f, "Bus Error: {:?}", bus_error),
            Error::LibraryError(err) => write!(f, "Library Error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<I> std::error::Error for Error<I>
where
    I: Interface,
    I::Error: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BusError(bus_error) => Some(bus_error),
            Error::LibraryError(lib_err) => Some(lib_err),
        }
    }
}

impl<I> From<LibraryError> for Error<I>
where
    I: Interface,
{
    fn from(lib_err: LibraryError) -> Self {
        Self::LibraryError(lib_err)
    }
}

impl<I> Error<I>
where
    I: Interface,
{
    /// True if this error is [`LibraryError::NotInitialized`].
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::LibraryError(LibraryError::NotInitialized))
    }
}
