//! Container behaviour flags

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Bitset of container behaviours.
///
/// ```rust
/// use component_resolver::Flags;
///
/// let flags = Flags::DEFAULT_FLAGS | Flags::AUTO_BIND_INTERFACES;
/// assert!(flags.contains(Flags::AUTO_ADD_DEPENDENCIES));
///
/// let strict = Flags::DEFAULT_FLAGS & !Flags::AUTO_ADD_DEPENDENCIES;
/// assert!(strict.is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(u32);

impl Flags {
    /// No behaviour enabled
    pub const NONE: Flags = Flags(0);

    /// Bind every interface a component implements to it when the component
    /// is added, unless the interface is already bound
    pub const AUTO_BIND_INTERFACES: Flags = Flags(1 << 0);

    /// Construct unregistered constructor dependencies on demand instead of
    /// failing; also the default auto-add policy of `get_component`
    pub const AUTO_ADD_DEPENDENCIES: Flags = Flags(1 << 1);

    /// Flags used when none are supplied
    pub const DEFAULT_FLAGS: Flags = Flags::AUTO_ADD_DEPENDENCIES;

    const ALL: u32 = Self::AUTO_BIND_INTERFACES.0 | Self::AUTO_ADD_DEPENDENCIES.0;

    /// Build from raw bits, dropping unknown ones
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check that every flag in `other` is set
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::DEFAULT_FLAGS
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    #[inline]
    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl BitAndAssign for Flags {
    #[inline]
    fn bitand_assign(&mut self, rhs: Flags) {
        self.0 &= rhs.0;
    }
}

impl Not for Flags {
    type Output = Flags;

    /// Complement within the known flags
    #[inline]
    fn not(self) -> Flags {
        Flags(!self.0 & Self::ALL)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::AUTO_BIND_INTERFACES) {
            names.push("AUTO_BIND_INTERFACES");
        }
        if self.contains(Self::AUTO_ADD_DEPENDENCIES) {
            names.push("AUTO_ADD_DEPENDENCIES");
        }
        if names.is_empty() {
            f.write_str("Flags(NONE)")
        } else {
            write!(f, "Flags({})", names.join(" | "))
        }
    }
}
