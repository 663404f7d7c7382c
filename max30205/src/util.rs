// SPDX-License-Identifier: Apache-2.0
// Copyright © 2021 Will Ross

/// Check if the n-th bit is set.
///
/// Bits are 0-indexed, from the LSB.
pub(crate) fn is_bit_set<B>(value: B, index: usize) -> bool
where
    B: num_traits::PrimInt + num_traits::Unsigned,
{
    (value & (B::one() << index)) > B::zero()
}

/// Set or clear the n-th bit, returning the new value.
pub(crate) fn with_bit<B>(value: B, index: usize, set: bool) -> B
where
    B: num_traits::PrimInt + num_traits::Unsigned,
{
    let mask = B::one() << index;
    if set {
        value | mask
    } else {
        value & !mask
    }
}

#[cfg(test)]
mod test {
    use super::{is_bit_set, with_bit};

    #[test]
    fn bit_set() {
        assert!(is_bit_set(0x80u8, 7));
        assert!(!is_bit_set(0x80u8, 6));
        assert!(is_bit_set(0x0001u16, 0));
    }

    #[test]
    fn set_and_clear() {
        assert_eq!(with_bit(0x00u8, 5, true), 0x20);
        assert_eq!(with_bit(0xFFu8, 5, false), 0xDF);
        // Already in the requested state
        assert_eq!(with_bit(0x20u8, 5, true), 0x20);
    }
}
