//! A pure-Rust driver for the Maxim MAX30205 human body temperature sensor.
//!
//! The MAX30205 is a 16-bit I²C temperature sensor with 0.1 ℃ accuracy over the human body
//! temperature range, and an over-temperature output (the OS pin) with programmable thresholds.
//!
//! This library uses the [`embedded-hal`][embedded-hal] blocking I²C and delay traits, so it
//! should work on any platform with an `embedded-hal` implementation. It is also `no_std`
//! compatible, with floating point functions coming from either `std` or `libm`.
//!
//! [embedded-hal]: https://docs.rs/embedded-hal/0.2/embedded_hal/blocking/i2c/index.html
//!
//! # Readers
//! ```no_run
//! use std::thread::sleep;
//! use std::time::Duration;
//! use linux_embedded_hal::{Delay, I2cdev};
//! use max30205::{AddressPins, ContinuousReader, I2cInterface, Settings};
//!
//! let i2c_bus = I2cdev::new("/dev/i2c-1").expect("/dev/i2c-1 needs to be an I2C controller");
//! // All address pins grounded gives the default address, 0x48
//! let mut reader = ContinuousReader::new(
//!     I2cInterface::new(i2c_bus),
//!     Delay,
//!     AddressPins::default(),
//!     &Settings::default(),
//! )?;
//! for _ in 0..3 {
//!     let reading = reader.read()?;
//!     println!("{:.2}℃", reading.celsius);
//!     sleep(Duration::from_secs(1));
//! }
//! reader.deinit()?;
//! # Ok::<(), max30205::Error<I2cInterface<I2cdev>>>(())
//! ```
//! The readers in the [`reader`] module bundle the common ways of using the sensor: continuous
//! conversions, a single conversion per read ([`ShotReader`]), and continuous conversions with
//! the OS pin set up for threshold alerts ([`InterruptReader`]).
//!
//! # Driver
//! [`Max30205`] is what the readers are built on. The configuration register is kept as a shadow
//! copy in the driver; changing a setting only changes the shadow, and the shadow is sent to the
//! sensor whenever the read state changes (starting or stopping continuous reads, triggering a
//! single read, or powering down).
//!
//! The bus is abstracted behind [`Interface`], with [`I2cInterface`] adapting any `embedded-hal`
//! I²C bus. Errors from the bus are returned as [`Error::BusError`] and logged through the `log`
//! facade.

#![no_std]
#![allow(clippy::float_cmp)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("Either the 'std' or 'libm' feature must be enabled.");

pub mod address;
pub mod conversion;
#[doc(hidden)]
pub mod driver;
#[doc(hidden)]
pub mod error;
pub mod info;
pub mod interface;
pub mod reader;
pub mod register;
mod settings;
mod util;

pub use address::{AddressPins, Connection, A2};
#[doc(inline)]
pub use driver::{Max30205, ReadState, Reading, CONVERSION_TIME_MS};
#[doc(inline)]
pub use error::{Error, LibraryError};
pub use info::{info, ChipInfo};
pub use interface::{I2cInterface, I2cInterfaceError, Interface};
pub use reader::{ContinuousReader, InterruptReader, ShotReader};
pub use register::*;
pub use settings::Settings;
