// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross

use embedded_hal::blocking::delay::DelayMs;
use log::{debug, error};
use paste::paste;

use crate::address::AddressPins;
use crate::conversion::{celsius_to_raw, raw_from_bytes, raw_to_celsius};
use crate::error::{Error, LibraryError};
use crate::interface::Interface;
use crate::register::*;
use crate::settings::Settings;

/// How long a single conversion takes, in milliseconds.
pub const CONVERSION_TIME_MS: u32 = 50;

/// DRY macro for the get/set pairs on `Max30205` that work on the configuration shadow.
///
/// Neither method touches the bus, but both need the sensor to be initialized.
macro_rules! configuration_field {
    { $field:ident, $typ:ty, $doc:literal } => {
    paste! {
        #[doc = "Get the requested " $doc "."]
        ///
        /// This is the value in the configuration shadow, which may not have been sent to the
        /// sensor yet.
        pub fn $field(&self) -> Result<$typ, Error<I>> {
            self.check_initialized()?;
            Ok(self.configuration.$field())
        }

        #[doc = "Set the " $doc "."]
        ///
        /// Only the configuration shadow is changed. The new value reaches the sensor with the
        /// next start, stop or single read, or power down.
        pub fn [< set_ $field >](&mut self, new_value: $typ) -> Result<(), Error<I>> {
            self.check_initialized()?;
            self.configuration.[< set_ $field >](new_value);
            Ok(())
        }
    }};
}

/// The read state the sensor was last commanded into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadState {
    /// Powered down, no conversions running.
    Shutdown,

    /// Converting continuously.
    Continuous,

    /// A one-shot conversion was triggered but the result hasn't been read yet.
    OneShotPending,
}

/// A temperature read from the sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// The register value.
    pub raw: i16,

    /// The register value converted with the data format in effect at the time of the read.
    pub celsius: f32,
}

/// Driver for a MAX30205 temperature sensor.
///
/// The configuration register is never read back from the sensor. Instead a shadow copy is kept
/// and changed by the configuration accessors, then written as a whole by the operations that
/// change the read state ([`start_continuous_read`][Max30205::start_continuous_read],
/// [`stop_continuous_read`][Max30205::stop_continuous_read],
/// [`single_read`][Max30205::single_read], [`power_down`][Max30205::power_down] and
/// [`deinit`][Max30205::deinit]).
///
/// Almost every method needs [`init`][Max30205::init] to have been called first, and returns
/// [`LibraryError::NotInitialized`] otherwise without touching the bus.
#[derive(Clone, Debug)]
pub struct Max30205<I, D> {
    /// The bus the sensor is accessible on.
    interface: I,

    /// Used to wait out one-shot conversions.
    delay: D,

    /// The address pin strapping, which selects the I²C address.
    address_pins: AddressPins,

    /// Shadow of the configuration register.
    configuration: ConfigurationRegister,

    initialized: bool,

    state: ReadState,
}

impl<I, D> Max30205<I, D>
where
    I: Interface,
    D: DelayMs<u32>,
{
    /// Create an uninitialized driver at the default address (all address pins grounded).
    pub fn new(interface: I, delay: D) -> Self {
        Self {
            interface,
            delay,
            address_pins: AddressPins::default(),
            configuration: ConfigurationRegister::default(),
            initialized: false,
            state: ReadState::Shutdown,
        }
    }

    /// Create an uninitialized driver for a sensor with the given address pin strapping.
    pub fn new_with_address_pins(interface: I, delay: D, address_pins: AddressPins) -> Self {
        let mut sensor = Self::new(interface, delay);
        sensor.set_address_pins(address_pins);
        sensor
    }

    /// Set the address pin strapping. Takes effect on the next bus access.
    pub fn set_address_pins(&mut self, address_pins: AddressPins) {
        self.address_pins = address_pins;
    }

    pub fn address_pins(&self) -> AddressPins {
        self.address_pins
    }

    /// The 7-bit I²C address the driver is using.
    pub fn address(&self) -> u8 {
        self.address_pins.address()
    }

    /// Bring up the bus and mark the driver as ready for use.
    ///
    /// The configuration shadow is reset to all zeros. Nothing is sent to the sensor.
    pub fn init(&mut self) -> Result<(), Error<I>> {
        if let Err(bus_error) = self.interface.init() {
            error!("bus init failed");
            return Err(Error::BusError(bus_error));
        }
        self.initialized = true;
        self.configuration = ConfigurationRegister::default();
        self.state = ReadState::Shutdown;
        debug!("initialized sensor at {:#04x}", self.address());
        Ok(())
    }

    /// Power the sensor down and release the bus.
    ///
    /// If either step fails the driver stays initialized, so this can be retried.
    pub fn deinit(&mut self) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_configuration(self.configuration.powered_down(), "power down")?;
        self.state = ReadState::Shutdown;
        if let Err(bus_error) = self.interface.deinit() {
            error!("bus deinit failed");
            return Err(Error::BusError(bus_error));
        }
        self.initialized = false;
        debug!("deinitialized sensor at {:#04x}", self.address());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The read state the sensor was last put in.
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Give back the interface and delay.
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    /// The configuration shadow.
    pub fn configuration(&self) -> Result<ConfigurationRegister, Error<I>> {
        self.check_initialized()?;
        Ok(self.configuration)
    }

    configuration_field! {
        data_format,
        DataFormat,
        "temperature data format"
    }

    configuration_field! {
        interrupt_mode,
        InterruptMode,
        "OS pin interrupt mode"
    }

    configuration_field! {
        fault_queue,
        FaultQueue,
        "fault queue depth"
    }

    configuration_field! {
        pin_polarity,
        PinPolarity,
        "OS pin polarity"
    }

    configuration_field! {
        bus_timeout,
        BusTimeout,
        "bus timeout"
    }

    /// Apply a full set of settings.
    ///
    /// The configuration fields only change the shadow, but the thresholds are converted (with
    /// the new data format) and written to the sensor.
    pub fn apply(&mut self, settings: &Settings) -> Result<(), Error<I>> {
        self.set_data_format(settings.data_format)?;
        self.set_interrupt_mode(settings.interrupt_mode)?;
        self.set_fault_queue(settings.fault_queue)?;
        self.set_pin_polarity(settings.pin_polarity)?;
        self.set_bus_timeout(settings.bus_timeout)?;
        let low_threshold = self.convert_to_register(settings.low_threshold)?;
        self.set_interrupt_low_threshold(low_threshold)?;
        let high_threshold = self.convert_to_register(settings.high_threshold)?;
        self.set_interrupt_high_threshold(high_threshold)
    }

    /// Convert a temperature (in ℃) to a raw register value, using the current data format.
    pub fn convert_to_register(&self, celsius: f32) -> Result<i16, Error<I>> {
        self.check_initialized()?;
        Ok(celsius_to_raw(celsius, self.configuration.data_format()))
    }

    /// Convert a raw register value to a temperature (in ℃), using the current data format.
    pub fn convert_to_data(&self, raw: i16) -> Result<f32, Error<I>> {
        self.check_initialized()?;
        Ok(raw_to_celsius(raw, self.configuration.data_format()))
    }

    /// Leave shutdown and start converting continuously.
    ///
    /// Both the shutdown and one-shot bits are cleared in the same write.
    pub fn start_continuous_read(&mut self) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_configuration(self.configuration.continuous(), "start continuous read")?;
        self.state = ReadState::Continuous;
        Ok(())
    }

    /// Read the most recent conversion.
    ///
    /// This doesn't check that continuous reads were started. If they weren't, the sensor keeps
    /// reporting whatever the last conversion was.
    pub fn continuous_read(&mut self) -> Result<Reading, Error<I>> {
        self.check_initialized()?;
        self.read_temperature("continuous read")
    }

    /// Stop converting and enter shutdown.
    ///
    /// Both the shutdown and one-shot bits are set in the same write.
    pub fn stop_continuous_read(&mut self) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_configuration(self.configuration.shutdown_one_shot(), "stop continuous read")?;
        self.state = ReadState::Shutdown;
        Ok(())
    }

    /// Trigger a single conversion, wait for it to finish, then read it.
    ///
    /// This is one configuration write (shutdown and one-shot set), a
    /// [`CONVERSION_TIME_MS`] delay, and one temperature read.
    pub fn single_read(&mut self) -> Result<Reading, Error<I>> {
        self.check_initialized()?;
        self.write_configuration(self.configuration.shutdown_one_shot(), "single read trigger")?;
        self.state = ReadState::OneShotPending;
        self.delay.delay_ms(CONVERSION_TIME_MS);
        let reading = self.read_temperature("single read")?;
        self.state = ReadState::Shutdown;
        Ok(reading)
    }

    /// Put the sensor into shutdown, from any state.
    ///
    /// Unlike [`stop_continuous_read`][Max30205::stop_continuous_read], only the shutdown bit is
    /// set.
    pub fn power_down(&mut self) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_configuration(self.configuration.powered_down(), "power down")?;
        self.state = ReadState::Shutdown;
        Ok(())
    }

    /// Set the low threshold (T<sub>HYST</sub>) as a raw register value.
    ///
    /// Use [`convert_to_register`][Max30205::convert_to_register] to get a raw value from a
    /// temperature.
    pub fn set_interrupt_low_threshold(&mut self, threshold: i16) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_threshold(Register::Hysteresis, threshold, "set low threshold")
    }

    /// Get the low threshold (T<sub>HYST</sub>) as a raw register value.
    pub fn interrupt_low_threshold(&mut self) -> Result<i16, Error<I>> {
        self.check_initialized()?;
        self.read_register(Register::Hysteresis, "get low threshold")
    }

    /// Set the high threshold (T<sub>OS</sub>) as a raw register value.
    pub fn set_interrupt_high_threshold(&mut self, threshold: i16) -> Result<(), Error<I>> {
        self.check_initialized()?;
        self.write_threshold(Register::Overtemperature, threshold, "set high threshold")
    }

    /// Get the high threshold (T<sub>OS</sub>) as a raw register value.
    pub fn interrupt_high_threshold(&mut self) -> Result<i16, Error<I>> {
        self.check_initialized()?;
        self.read_register(Register::Overtemperature, "get high threshold")
    }

    /// Write bytes to an arbitrary register.
    ///
    /// The length isn't checked against the register width, and any limit on the payload comes
    /// from the interface (see [`MAX_WRITE_LENGTH`][crate::interface::MAX_WRITE_LENGTH] for
    /// [`I2cInterface`][crate::I2cInterface]). The configuration shadow is *not* updated by this.
    pub fn write_raw_register(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I>> {
        self.check_initialized()?;
        let address = self.address();
        self.interface
            .write(address, register, data)
            .map_err(|bus_error| {
                error!("write register {:#04x} failed", register);
                Error::BusError(bus_error)
            })
    }

    /// Read bytes from an arbitrary register, as many as `buffer` holds.
    pub fn read_raw_register(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error<I>> {
        self.check_initialized()?;
        let address = self.address();
        self.interface
            .read(address, register, buffer)
            .map_err(|bus_error| {
                error!("read register {:#04x} failed", register);
                Error::BusError(bus_error)
            })
    }

    fn check_initialized(&self) -> Result<(), LibraryError> {
        if self.initialized {
            Ok(())
        } else {
            Err(LibraryError::NotInitialized)
        }
    }

    fn write_configuration(
        &mut self,
        register: ConfigurationRegister,
        operation: &'static str,
    ) -> Result<(), Error<I>> {
        let address = self.address();
        let raw: u8 = register.into();
        self.interface
            .write(address, Register::Configuration.into(), &[raw])
            .map_err(|bus_error| {
                error!("{} failed", operation);
                Error::BusError(bus_error)
            })
    }

    fn read_register(
        &mut self,
        register: Register,
        operation: &'static str,
    ) -> Result<i16, Error<I>> {
        let address = self.address();
        let mut buf = [0u8; 2];
        self.interface
            .read(address, register.into(), &mut buf)
            .map_err(|bus_error| {
                error!("{} failed", operation);
                Error::BusError(bus_error)
            })?;
        Ok(raw_from_bytes(buf))
    }

    fn read_temperature(&mut self, operation: &'static str) -> Result<Reading, Error<I>> {
        let raw = self.read_register(Register::Temperature, operation)?;
        let celsius = raw_to_celsius(raw, self.configuration.data_format());
        Ok(Reading { raw, celsius })
    }

    fn write_threshold(
        &mut self,
        register: Register,
        threshold: i16,
        operation: &'static str,
    ) -> Result<(), Error<I>> {
        let address = self.address();
        self.interface
            .write(address, register.into(), &threshold.to_be_bytes())
            .map_err(|bus_error| {
                error!("{} failed", operation);
                Error::BusError(bus_error)
            })
    }
}
