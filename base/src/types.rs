use std::fmt::{self, Display, Formatter};

#[cfg(test)]
use test_strategy::proptest;

/// A memory cell index.  Every emitted instruction, every constant
/// and every variable slot occupies exactly one address.
///
/// Memory is a flat array of cells, so an address is simply the
/// position of a line in the emitted image, offset by the origin of
/// that image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u32);

impl Address {
    pub const ZERO: Address = Address(0);

    #[must_use]
    pub const fn new(value: u32) -> Address {
        Address(value)
    }

    /// The address of the cell which immediately follows this one.
    ///
    /// # Panics
    ///
    /// Panics if the address space (which is far larger than any
    /// memory the CPU actually has) is exhausted.
    #[must_use]
    pub fn successor(self) -> Address {
        match self.0.checked_add(1) {
            Some(n) => Address(n),
            None => panic!("address {self} has no successor"),
        }
    }

    /// Number of cells from `origin` up to (but not including) this
    /// address, or `None` if this address lies below `origin`.
    #[must_use]
    pub fn offset_from(self, origin: Address) -> Option<u32> {
        self.0.checked_sub(origin.0)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Address {
        Address(value)
    }
}

impl From<Address> for u32 {
    fn from(a: Address) -> u32 {
        a.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_address_display() {
    assert_eq!(Address::new(41).to_string(), "41");
    assert_eq!(Address::ZERO.to_string(), "0");
}

#[test]
fn test_offset_from() {
    let origin = Address::new(17);
    assert_eq!(Address::new(20).offset_from(origin), Some(3));
    assert_eq!(Address::new(17).offset_from(origin), Some(0));
    assert_eq!(Address::new(16).offset_from(origin), None);
}

#[cfg(test)]
#[proptest]
fn successor_is_one_further_from_origin(#[strategy(0..u32::MAX)] n: u32) {
    let a = Address::new(n);
    let next = a.successor();
    assert!(next > a);
    assert_eq!(next.offset_from(a), Some(1));
    assert_eq!(u32::from(next), n + 1);
}
