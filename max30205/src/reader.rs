// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! Ready-made ways of reading the sensor.
//!
//! Each reader owns a [`Max30205`] and brings it all the way up in its constructor: init, apply
//! the settings, and (for the continuous and interrupt readers) start continuous conversions. If
//! anything after init fails, the sensor is deinitialized again (errors from that are only
//! logged) and the original error is returned.
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, warn};

use crate::address::AddressPins;
use crate::driver::{Max30205, Reading};
use crate::error::Error;
use crate::interface::Interface;
use crate::register::InterruptMode;
use crate::settings::Settings;

fn bring_up<I, D, F>(
    interface: I,
    delay: D,
    address_pins: AddressPins,
    settings: &Settings,
    start: F,
) -> Result<Max30205<I, D>, Error<I>>
where
    I: Interface,
    D: DelayMs<u32>,
    F: FnOnce(&mut Max30205<I, D>) -> Result<(), Error<I>>,
{
    let mut sensor = Max30205::new_with_address_pins(interface, delay, address_pins);
    sensor.init()?;
    let configured = sensor
        .apply(settings)
        .and_then(|_| start(&mut sensor));
    match configured {
        Ok(_) => Ok(sensor),
        Err(err) => {
            if sensor.deinit().is_err() {
                warn!("unable to deinit sensor after a failed bring up");
            }
            Err(err)
        }
    }
}

/// Reads the latest result of continuous conversions.
#[derive(Debug)]
pub struct ContinuousReader<I, D> {
    sensor: Max30205<I, D>,
}

impl<I, D> ContinuousReader<I, D>
where
    I: Interface,
    D: DelayMs<u32>,
{
    pub fn new(
        interface: I,
        delay: D,
        address_pins: AddressPins,
        settings: &Settings,
    ) -> Result<Self, Error<I>> {
        let sensor = bring_up(interface, delay, address_pins, settings, |sensor| {
            sensor.start_continuous_read()
        })?;
        debug!("continuous reader started");
        Ok(Self { sensor })
    }

    pub fn read(&mut self) -> Result<Reading, Error<I>> {
        self.sensor.continuous_read()
    }

    /// Stop conversions and deinitialize the sensor.
    pub fn deinit(&mut self) -> Result<(), Error<I>> {
        self.sensor.stop_continuous_read()?;
        self.sensor.deinit()
    }

    /// Access the sensor directly.
    pub fn sensor(&mut self) -> &mut Max30205<I, D> {
        &mut self.sensor
    }

    pub fn release(self) -> (I, D) {
        self.sensor.release()
    }
}

/// Takes a single conversion for each read, leaving the sensor shut down in between.
#[derive(Debug)]
pub struct ShotReader<I, D> {
    sensor: Max30205<I, D>,
}

impl<I, D> ShotReader<I, D>
where
    I: Interface,
    D: DelayMs<u32>,
{
    pub fn new(
        interface: I,
        delay: D,
        address_pins: AddressPins,
        settings: &Settings,
    ) -> Result<Self, Error<I>> {
        let sensor = bring_up(interface, delay, address_pins, settings, |_| Ok(()))?;
        debug!("shot reader ready");
        Ok(Self { sensor })
    }

    /// Trigger a conversion and wait for it. Blocks for about 50ms.
    pub fn read(&mut self) -> Result<Reading, Error<I>> {
        self.sensor.single_read()
    }

    pub fn deinit(&mut self) -> Result<(), Error<I>> {
        self.sensor.deinit()
    }

    pub fn sensor(&mut self) -> &mut Max30205<I, D> {
        &mut self.sensor
    }

    pub fn release(self) -> (I, D) {
        self.sensor.release()
    }
}

/// Converts continuously with the OS pin configured to signal threshold crossings.
///
/// Watching the OS pin is left to the caller.
#[derive(Debug)]
pub struct InterruptReader<I, D> {
    sensor: Max30205<I, D>,
}

impl<I, D> InterruptReader<I, D>
where
    I: Interface,
    D: DelayMs<u32>,
{
    /// Start a reader with [`Settings::interrupt`] and the given mode and thresholds (in ℃).
    pub fn new(
        interface: I,
        delay: D,
        address_pins: AddressPins,
        mode: InterruptMode,
        low_threshold: f32,
        high_threshold: f32,
    ) -> Result<Self, Error<I>> {
        let settings = Settings::interrupt(mode, low_threshold, high_threshold);
        let sensor = bring_up(interface, delay, address_pins, &settings, |sensor| {
            sensor.start_continuous_read()
        })?;
        debug!(
            "interrupt reader started ({:?}, {} to {})",
            mode, low_threshold, high_threshold
        );
        Ok(Self { sensor })
    }

    pub fn read(&mut self) -> Result<Reading, Error<I>> {
        self.sensor.continuous_read()
    }

    pub fn deinit(&mut self) -> Result<(), Error<I>> {
        self.sensor.stop_continuous_read()?;
        self.sensor.deinit()
    }

    pub fn sensor(&mut self) -> &mut Max30205<I, D> {
        &mut self.sensor
    }

    pub fn release(self) -> (I, D) {
        self.sensor.release()
    }
}

#[cfg(test)]
mod test {
    extern crate std;

    use float_cmp::assert_approx_eq;
    use max30205_test_data::{mock_max30205_at_address, MockError, Operation};

    use super::*;
    use crate::driver::{ReadState, CONVERSION_TIME_MS};
    use crate::interface::{I2cInterface, I2cInterfaceError};
    use crate::register::FaultQueue;

    #[test]
    fn continuous() {
        let mocked = mock_max30205_at_address(0x48);
        let mut reader = ContinuousReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            AddressPins::default(),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(mocked.t_hyst(), 0x2300);
        assert_eq!(mocked.t_os(), 0x2700);
        // Only the bus timeout bit survives into continuous mode
        assert_eq!(mocked.configuration(), 0x40);
        assert_eq!(reader.sensor().state(), ReadState::Continuous);
        mocked.set_temperature(0x2400);
        assert_approx_eq!(f32, reader.read().unwrap().celsius, 36.0);
        reader.deinit().unwrap();
        assert!(!reader.sensor().is_initialized());
        assert!(mocked.configuration() & 0x01 != 0);
    }

    #[test]
    fn shot() {
        let mocked = mock_max30205_at_address(0x48);
        let mut reader = ShotReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            AddressPins::default(),
            &Settings::default(),
        )
        .unwrap();
        // The thresholds are the only bus traffic when bringing up a shot reader.
        assert_eq!(mocked.recent_operations().len(), 2);
        mocked.clear_recent_operations();
        let reading = reader.read().unwrap();
        assert_approx_eq!(f32, reading.celsius, 25.0);
        let ops = mocked.recent_operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[1],
            Operation::Delay {
                milliseconds: CONVERSION_TIME_MS
            }
        );
        drop(ops);
        reader.deinit().unwrap();
    }

    #[test]
    fn interrupt() {
        let mocked = mock_max30205_at_address(0x4C);
        let pins = AddressPins::from_address(0x4C).unwrap();
        let mut reader = InterruptReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            pins,
            InterruptMode::Interrupt,
            30.0,
            32.5,
        )
        .unwrap();
        assert_eq!(
            reader.sensor().fault_queue().unwrap(),
            FaultQueue::Two
        );
        // Interrupt mode, fault queue of two, bus timeout disabled
        assert_eq!(mocked.configuration(), 0x4A);
        assert_eq!(mocked.t_hyst(), 0x1E00);
        assert_eq!(mocked.t_os(), 0x2080);
        assert_eq!(reader.read().unwrap().raw, 0x1900);
        reader.deinit().unwrap();
        // Stopping sets shutdown and one-shot, then deinit powers down from the shadow
        let ops = mocked.recent_operations();
        let writes: std::vec::Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::Write { register: 0x01, data } => Some(data[0]),
                _ => None,
            })
            .collect();
        assert_eq!(writes, [0x4A, 0xCB, 0x4B]);
    }

    #[test]
    fn failed_bring_up() {
        let mocked = mock_max30205_at_address(0x48);
        mocked.set_fail_writes(true);
        let result = ContinuousReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            AddressPins::default(),
            &Settings::default(),
        );
        assert!(matches!(
            result,
            Err(Error::BusError(I2cInterfaceError::Bus(MockError::Injected)))
        ));
        assert!(mocked.recent_operations().is_empty());
    }

    #[test]
    fn wrong_address() {
        let mocked = mock_max30205_at_address(0x48);
        let result = ShotReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            AddressPins::from_index(0x01).unwrap(),
            &Settings::default(),
        );
        assert!(matches!(
            result,
            Err(Error::BusError(I2cInterfaceError::Bus(
                MockError::UnknownI2cAddress(0x49)
            )))
        ));
    }

    #[test]
    fn release() {
        let mocked = mock_max30205_at_address(0x48);
        let reader = ShotReader::new(
            I2cInterface::new(mocked.clone()),
            mocked.delay(),
            AddressPins::default(),
            &Settings::default(),
        )
        .unwrap();
        let (interface, _) = reader.release();
        assert_eq!(interface.release().t_os(), 0x2700);
    }
}
