// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
extern crate alloc;

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::{Cell, Ref, RefCell};

use arrayvec::ArrayVec;
use embedded_hal::blocking::{delay, i2c};

const TEMPERATURE_REGISTER: u8 = 0x00;
const CONFIGURATION_REGISTER: u8 = 0x01;
const T_HYST_REGISTER: u8 = 0x02;
const T_OS_REGISTER: u8 = 0x03;

/// Power-on value of the hysteresis register (75 ℃).
pub const POWER_ON_T_HYST: [u8; 2] = [0x4B, 0x00];

/// Power-on value of the overtemperature register (80 ℃).
pub const POWER_ON_T_OS: [u8; 2] = [0x50, 0x00];

const RECENT_OPERATIONS_QUEUE_LENGTH: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MockError {
    /// An unknown I2C address was given.
    UnknownI2cAddress(u8),

    /// The register pointer doesn't name one of the four registers.
    UnknownRegister(u8),

    /// The given register is read-only.
    IllegalWrite(u8),

    /// The transfer length doesn't match the register width, or no register pointer was sent.
    IllegalOperation,

    /// Failure injected by the test.
    Injected,
}

/// A single bus (or delay) transaction, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Write { register: u8, data: ArrayVec<u8, 2> },
    Read { register: u8, length: usize },
    Delay { milliseconds: u32 },
}

/// A mock MAX30205 on an I²C bus.
///
/// Clones share the register contents, the operation log and the failure flags, so a test can
/// keep one clone and hand the other to the driver.
#[derive(Clone, Debug)]
pub struct MockSensorBus {
    i2c_address: u8,
    temperature: Rc<RefCell<[u8; 2]>>,
    configuration: Rc<Cell<u8>>,
    t_hyst: Rc<RefCell<[u8; 2]>>,
    t_os: Rc<RefCell<[u8; 2]>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
    recent_operations: Rc<RefCell<VecDeque<Operation>>>,
}

impl MockSensorBus {
    pub fn new(i2c_address: u8) -> Self {
        Self {
            i2c_address,
            temperature: Rc::new(RefCell::new([0x00, 0x00])),
            configuration: Rc::new(Cell::new(0x00)),
            t_hyst: Rc::new(RefCell::new(POWER_ON_T_HYST)),
            t_os: Rc::new(RefCell::new(POWER_ON_T_OS)),
            fail_reads: Rc::new(Cell::new(false)),
            fail_writes: Rc::new(Cell::new(false)),
            recent_operations: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// A delay provider that records into this bus's operation log.
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            recent_operations: Rc::clone(&self.recent_operations),
        }
    }

    /// Set the raw value the temperature register will report.
    pub fn set_temperature(&self, raw: i16) {
        *self.temperature.borrow_mut() = raw.to_be_bytes();
    }

    /// The current contents of the configuration register.
    pub fn configuration(&self) -> u8 {
        self.configuration.get()
    }

    pub fn t_hyst(&self) -> i16 {
        i16::from_be_bytes(*self.t_hyst.borrow())
    }

    pub fn t_os(&self) -> i16 {
        i16::from_be_bytes(*self.t_os.borrow())
    }

    /// Make every following read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn register_width(register: u8) -> Result<usize, MockError> {
        match register {
            TEMPERATURE_REGISTER | T_HYST_REGISTER | T_OS_REGISTER => Ok(2),
            CONFIGURATION_REGISTER => Ok(1),
            _ => Err(MockError::UnknownRegister(register)),
        }
    }

    fn get(&self, register: u8, out_buffer: &mut [u8]) -> Result<(), MockError> {
        let width = Self::register_width(register)?;
        if out_buffer.len() > width {
            return Err(MockError::IllegalOperation);
        }
        let length = out_buffer.len();
        match register {
            TEMPERATURE_REGISTER => {
                out_buffer.copy_from_slice(&self.temperature.borrow()[..length])
            }
            CONFIGURATION_REGISTER => {
                if let Some(byte) = out_buffer.first_mut() {
                    *byte = self.configuration.get();
                }
            }
            T_HYST_REGISTER => out_buffer.copy_from_slice(&self.t_hyst.borrow()[..length]),
            T_OS_REGISTER => out_buffer.copy_from_slice(&self.t_os.borrow()[..length]),
            _ => unreachable!(),
        }
        Ok(())
    }

    fn set(&self, register: u8, data: &[u8]) -> Result<(), MockError> {
        let width = Self::register_width(register)?;
        if data.len() != width {
            return Err(MockError::IllegalOperation);
        }
        match register {
            TEMPERATURE_REGISTER => return Err(MockError::IllegalWrite(register)),
            CONFIGURATION_REGISTER => self.configuration.set(data[0]),
            T_HYST_REGISTER => self.t_hyst.borrow_mut().copy_from_slice(data),
            T_OS_REGISTER => self.t_os.borrow_mut().copy_from_slice(data),
            _ => unreachable!(),
        }
        Ok(())
    }

    fn add_operation(&self, operation: Operation) {
        push_operation(&self.recent_operations, operation);
    }

    /// Operations performed since the last clear, oldest first.
    pub fn recent_operations(&self) -> Ref<VecDeque<Operation>> {
        self.recent_operations.borrow()
    }

    pub fn clear_recent_operations(&self) {
        self.recent_operations.borrow_mut().clear()
    }
}

fn push_operation(log: &RefCell<VecDeque<Operation>>, operation: Operation) {
    let mut recent_ops = log.borrow_mut();
    recent_ops.push_back(operation);
    while recent_ops.len() > RECENT_OPERATIONS_QUEUE_LENGTH {
        recent_ops.pop_front();
    }
}

impl i2c::Write for MockSensorBus {
    type Error = MockError;

    fn write(&mut self, i2c_address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if i2c_address != self.i2c_address {
            return Err(MockError::UnknownI2cAddress(i2c_address));
        }
        if self.fail_writes.get() {
            return Err(MockError::Injected);
        }
        let (register, payload) = bytes.split_first().ok_or(MockError::IllegalOperation)?;
        self.set(*register, payload)?;
        let mut data = ArrayVec::new();
        // set() has already limited the payload to a register width.
        data.extend(payload.iter().copied());
        self.add_operation(Operation::Write {
            register: *register,
            data,
        });
        Ok(())
    }
}

impl i2c::WriteRead for MockSensorBus {
    type Error = MockError;

    fn write_read(
        &mut self,
        i2c_address: u8,
        write_buffer: &[u8],
        out_buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        if i2c_address != self.i2c_address {
            return Err(MockError::UnknownI2cAddress(i2c_address));
        }
        // Only the register pointer is written before a read.
        if write_buffer.len() != 1 {
            return Err(MockError::IllegalOperation);
        }
        if self.fail_reads.get() {
            return Err(MockError::Injected);
        }
        let register = write_buffer[0];
        self.add_operation(Operation::Read {
            register,
            length: out_buffer.len(),
        });
        self.get(register, out_buffer)
    }
}

/// Delay provider that doesn't wait, it only records the request.
#[derive(Clone, Debug)]
pub struct MockDelay {
    recent_operations: Rc<RefCell<VecDeque<Operation>>>,
}

impl delay::DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, milliseconds: u32) {
        push_operation(&self.recent_operations, Operation::Delay { milliseconds });
    }
}

/// A mock sensor with a 25 ℃ reading in the temperature register.
pub fn mock_max30205_at_address(i2c_address: u8) -> MockSensorBus {
    let bus = MockSensorBus::new(i2c_address);
    bus.set_temperature(0x1900);
    bus
}

#[cfg(test)]
mod test {
    use embedded_hal::blocking::i2c::{Write, WriteRead};

    use super::*;

    #[test]
    fn wrong_address() {
        let mut bus = MockSensorBus::new(0x48);
        let mut buf = [0u8; 2];
        assert_eq!(
            bus.write_read(0x49, &[TEMPERATURE_REGISTER], &mut buf),
            Err(MockError::UnknownI2cAddress(0x49))
        );
    }

    #[test]
    fn temperature_read_only() {
        let mut bus = MockSensorBus::new(0x48);
        assert_eq!(
            bus.write(0x48, &[TEMPERATURE_REGISTER, 0x12, 0x34]),
            Err(MockError::IllegalWrite(TEMPERATURE_REGISTER))
        );
        assert!(bus.recent_operations().is_empty());
    }

    #[test]
    fn shared_state() {
        let mut bus = mock_max30205_at_address(0x48);
        let observer = bus.clone();
        bus.write(0x48, &[T_OS_REGISTER, 0x27, 0x00]).unwrap();
        assert_eq!(observer.t_os(), 0x2700);
        assert_eq!(observer.recent_operations().len(), 1);
        let mut buf = [0u8; 2];
        bus.write_read(0x48, &[TEMPERATURE_REGISTER], &mut buf)
            .unwrap();
        assert_eq!(buf, [0x19, 0x00]);
    }

    #[test]
    fn delay_shares_log() {
        use embedded_hal::blocking::delay::DelayMs;
        let bus = MockSensorBus::new(0x48);
        let mut delay = bus.delay();
        delay.delay_ms(50u32);
        assert_eq!(
            bus.recent_operations()[0],
            Operation::Delay { milliseconds: 50 }
        );
    }
}
