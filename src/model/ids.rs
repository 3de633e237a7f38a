//! Arena index type for registry storage.
//!
//! Using `NonZeroU32` enables `Option<NodeId>` niche optimization (no
//! extra space for the unattached-parent case).

use core::num::NonZeroU32;

/// Registry tree node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Create from a raw value (1-based).
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Create from a 0-based arena index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(Self::from_raw)
    }

    /// Get the raw value (1-based).
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0.get()
    }

    /// Get the 0-based arena index.
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
