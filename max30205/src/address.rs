// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross
//! I²C address selection.
//!
//! The MAX30205 has three address pins. A2 can be tied to GND or V<sub>DD</sub>, while A1 and A0
//! can each be tied to GND, V<sub>DD</sub>, SCL or SDA, for 32 possible addresses. The mapping
//! from pin strapping to address is not linear, so it's a lookup table.
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::LibraryError;

/// 7-bit addresses, indexed by `A2 * 16 + A1 * 4 + A0` (see [`Connection`] for pin values).
const ADDRESSES: [u8; 32] = [
    0x48, 0x49, 0x41, 0x40, 0x4A, 0x4B, 0x43, 0x42, // A2 = GND, A1 = GND/VDD
    0x5A, 0x5B, 0x53, 0x52, 0x58, 0x59, 0x51, 0x50, // A2 = GND, A1 = SCL/SDA
    0x4C, 0x4D, 0x45, 0x44, 0x4E, 0x4F, 0x47, 0x46, // A2 = VDD, A1 = GND/VDD
    0x5E, 0x5F, 0x57, 0x56, 0x5C, 0x5D, 0x55, 0x54, // A2 = VDD, A1 = SCL/SDA
];

/// What an A1 or A0 pin is tied to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Connection {
    Gnd = 0,
    Vdd = 1,
    Scl = 2,
    Sda = 3,
}

/// What the A2 pin is tied to. A2 can't be tied to the bus lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum A2 {
    Gnd = 0,
    Vdd = 1,
}

/// The strapping of all three address pins.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AddressPins {
    a2: A2,
    a1: Connection,
    a0: Connection,
}

impl AddressPins {
    pub const fn new(a2: A2, a1: Connection, a0: Connection) -> Self {
        Self { a2, a1, a0 }
    }

    pub fn a2(&self) -> A2 {
        self.a2
    }

    pub fn a1(&self) -> Connection {
        self.a1
    }

    pub fn a0(&self) -> Connection {
        self.a0
    }

    /// The position of this strapping in the address table, from `0x00` to `0x1F`.
    ///
    /// This is the numbering used by the manufacturer's address table (address 0 through 1F).
    pub fn index(&self) -> u8 {
        let a2: u8 = self.a2.into();
        let a1: u8 = self.a1.into();
        let a0: u8 = self.a0.into();
        (a2 << 4) | (a1 << 2) | a0
    }

    /// Create an `AddressPins` from its position in the address table.
    /// ```
    /// # use max30205::{AddressPins, A2, Connection};
    /// let pins = AddressPins::from_index(0x0A).unwrap();
    /// assert_eq!(pins, AddressPins::new(A2::Gnd, Connection::Scl, Connection::Scl));
    /// assert!(AddressPins::from_index(0x20).is_err());
    /// ```
    pub fn from_index(index: u8) -> Result<Self, LibraryError> {
        if usize::from(index) >= ADDRESSES.len() {
            return Err(LibraryError::InvalidData(
                "Address pin index must be between 0x00 and 0x1F",
            ));
        }
        // Unwraps: each field is masked down to a range its enum fully covers.
        Ok(Self {
            a2: A2::try_from_primitive(index >> 4).unwrap(),
            a1: Connection::try_from_primitive((index >> 2) & 0x03).unwrap(),
            a0: Connection::try_from_primitive(index & 0x03).unwrap(),
        })
    }

    /// Find the strapping for a 7-bit I²C address.
    pub fn from_address(address: u8) -> Option<Self> {
        ADDRESSES
            .iter()
            .position(|candidate| *candidate == address)
            // The position is always less than 32, so it fits in a u8 and is a valid index.
            .and_then(|index| Self::from_index(index as u8).ok())
    }

    /// The 7-bit I²C address selected by this strapping.
    pub fn address(&self) -> u8 {
        ADDRESSES[usize::from(self.index())]
    }
}

impl Default for AddressPins {
    /// All three pins tied to ground, for address 0x48.
    fn default() -> Self {
        Self::new(A2::Gnd, Connection::Gnd, Connection::Gnd)
    }
}

impl From<AddressPins> for u8 {
    fn from(pins: AddressPins) -> Self {
        pins.address()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_address() {
        assert_eq!(AddressPins::default().address(), 0x48);
        assert_eq!(AddressPins::default().index(), 0);
    }

    #[test]
    fn index_round_trip() {
        for index in 0u8..32 {
            let pins = AddressPins::from_index(index).unwrap();
            assert_eq!(pins.index(), index);
        }
        assert!(AddressPins::from_index(32).is_err());
    }

    #[test]
    fn addresses_unique() {
        for (index, address) in ADDRESSES.iter().enumerate() {
            // Upper bits are fixed for every strapping
            assert_eq!(address & 0x60, 0x40, "Index {}", index);
            let pins = AddressPins::from_address(*address).unwrap();
            assert_eq!(usize::from(pins.index()), index);
        }
        assert!(AddressPins::from_address(0x33).is_none());
    }

    #[test]
    fn specific_strappings() {
        let cases = [
            (A2::Gnd, Connection::Gnd, Connection::Vdd, 0x49),
            (A2::Gnd, Connection::Gnd, Connection::Sda, 0x40),
            (A2::Gnd, Connection::Sda, Connection::Sda, 0x50),
            (A2::Vdd, Connection::Gnd, Connection::Gnd, 0x4C),
            (A2::Vdd, Connection::Vdd, Connection::Sda, 0x46),
            (A2::Vdd, Connection::Sda, Connection::Sda, 0x54),
        ];
        for (a2, a1, a0, expected) in cases {
            let pins = AddressPins::new(a2, a1, a0);
            assert_eq!(pins.address(), expected, "{:?}", pins);
            assert_eq!(u8::from(pins), expected);
        }
    }
}
