//! Node identifiers and their allocator.

use std::fmt;
use std::num::NonZeroU32;

use crate::{Error, Result};

/// A node identifier.
///
/// Identifiers are never 0: on the wire, 0 means "no node". A reference that
/// may be absent is therefore an `Option<Uid>`, which has the same size as a
/// `u32`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Uid(NonZeroU32);

impl Uid {
    /// Create an identifier, or `None` for the reserved value 0.
    #[inline]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Get the raw value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Wire value of an optional reference (0 when absent).
    #[inline]
    pub fn to_raw(reference: Option<Uid>) -> u32 {
        reference.map_or(0, Uid::get)
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uid> for u32 {
    #[inline]
    fn from(uid: Uid) -> Self {
        uid.get()
    }
}

/// Issues strictly increasing identifiers for one build session.
///
/// Identifiers below the base are left free for well-known nodes. The
/// allocator is an ordinary value: each session owns its own, so independent
/// builds never share a counter.
///
/// # Example
///
/// ```
/// use ssd_format::UidAllocator;
///
/// let mut ids = UidAllocator::default();
/// assert_eq!(ids.allocate().unwrap().get(), 50);
/// assert_eq!(ids.allocate().unwrap().get(), 51);
/// ```
#[derive(Debug, Clone)]
pub struct UidAllocator {
    next: Option<Uid>,
}

impl UidAllocator {
    /// First identifier handed out by a default allocator.
    pub const DEFAULT_BASE: u32 = 50;

    /// Create an allocator whose first identifier is `base`.
    ///
    /// A base of 0 starts at 1.
    pub fn new(base: u32) -> Self {
        Self {
            next: Uid::new(base.max(1)),
        }
    }

    /// Allocate the next identifier.
    pub fn allocate(&mut self) -> Result<Uid> {
        let uid = self.next.ok_or(Error::IdentifiersExhausted)?;
        self.next = uid.get().checked_add(1).and_then(Uid::new);
        Ok(uid)
    }

    /// The identifier the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> Option<Uid> {
        self.next
    }
}

impl Default for UidAllocator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_an_identifier() {
        assert!(Uid::new(0).is_none());
        assert_eq!(Uid::to_raw(None), 0);
        assert_eq!(Uid::to_raw(Uid::new(7)), 7);
        assert_eq!(std::mem::size_of::<Option<Uid>>(), 4);
    }

    #[test]
    fn test_allocation_is_strictly_increasing() {
        let mut ids = UidAllocator::new(10);
        let first = ids.allocate().unwrap();
        let second = ids.allocate().unwrap();
        assert_eq!(first.get(), 10);
        assert!(second > first);
        assert_eq!(ids.peek().map(Uid::get), Some(12));
    }

    #[test]
    fn test_zero_base_starts_at_one() {
        let mut ids = UidAllocator::new(0);
        assert_eq!(ids.allocate().unwrap().get(), 1);
    }

    #[test]
    fn test_exhaustion() {
        let mut ids = UidAllocator::new(u32::MAX);
        assert_eq!(ids.allocate().unwrap().get(), u32::MAX);
        assert!(matches!(ids.allocate(), Err(Error::IdentifiersExhausted)));
        assert!(matches!(ids.allocate(), Err(Error::IdentifiersExhausted)));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = UidAllocator::default();
        let mut b = UidAllocator::default();
        a.allocate().unwrap();
        a.allocate().unwrap();
        assert_eq!(b.allocate().unwrap().get(), UidAllocator::DEFAULT_BASE);
    }
}
