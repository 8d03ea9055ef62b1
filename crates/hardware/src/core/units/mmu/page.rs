//! Page descriptors.
//!
//! A page is the 4 KiB unit of mapping and permission. Each present page is
//! backed either by a RAM buffer or by a registered hardware device, never
//! both.

use std::fmt;

use crate::common::AccessType;
use crate::common::constants::{PAGE_MASK, WORDS_PER_PAGE};

/// Read/write/execute permission bits of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Permissions(u32);

impl Permissions {
    /// Loads allowed.
    pub const READ: Self = Self(4);
    /// Stores allowed.
    pub const WRITE: Self = Self(2);
    /// Instruction fetches allowed.
    pub const EXECUTE: Self = Self(1);
    /// All three.
    pub const ALL: Self = Self(7);
    /// No access from user mode.
    pub const NONE: Self = Self(0);

    /// Builds a permission set from its three-bit encoding.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the three-bit encoding.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every permission in `other` is granted.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if a user-mode access of the given type is allowed.
    pub const fn allows(self, access: AccessType) -> bool {
        match access {
            AccessType::Fetch => self.contains(Self::EXECUTE),
            AccessType::Read => self.contains(Self::READ),
            AccessType::Write => self.contains(Self::WRITE),
        }
    }
}

/// What a present page is backed by.
pub enum Backing {
    /// Present but unbacked; created by a mapping that has not bound a device yet.
    Unbacked,
    /// A zero-filled RAM buffer of one page of words.
    Ram(Box<[u32]>),
    /// An index into the device table.
    Device(usize),
}

/// A present page descriptor.
#[derive(Debug)]
pub struct Page {
    /// User-mode permissions.
    pub perms: Permissions,
    /// Backing store.
    pub backing: Backing,
}

impl Page {
    /// Creates a zero-filled RAM page with full permissions.
    pub fn ram() -> Self {
        Self {
            perms: Permissions::ALL,
            backing: Backing::Ram(vec![0; WORDS_PER_PAGE].into_boxed_slice()),
        }
    }

    /// Creates a page with full permissions and no backing.
    pub const fn unbacked() -> Self {
        Self {
            perms: Permissions::ALL,
            backing: Backing::Unbacked,
        }
    }

    /// Returns the device index if the page is device backed.
    pub const fn device(&self) -> Option<usize> {
        match self.backing {
            Backing::Device(index) => Some(index),
            _ => None,
        }
    }

    /// Returns the RAM word containing `addr`, if the page is RAM backed.
    pub fn ram_word(&self, addr: u32) -> Option<u32> {
        match &self.backing {
            Backing::Ram(words) => Some(words[word_index(addr)]),
            _ => None,
        }
    }

    /// Mutable access to the RAM word containing `addr`, if the page is RAM backed.
    pub fn ram_word_mut(&mut self, addr: u32) -> Option<&mut u32> {
        match &mut self.backing {
            Backing::Ram(words) => Some(&mut words[word_index(addr)]),
            _ => None,
        }
    }

    /// Returns `true` if the page owns a RAM buffer.
    pub const fn is_ram(&self) -> bool {
        matches!(self.backing, Backing::Ram(_))
    }
}

impl fmt::Debug for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbacked => f.write_str("Unbacked"),
            Self::Ram(_) => f.write_str("Ram"),
            Self::Device(index) => write!(f, "Device({index})"),
        }
    }
}

/// Index of the word holding `addr` within its page.
pub const fn word_index(addr: u32) -> usize {
    ((addr & PAGE_MASK) >> 2) as usize
}

/// Bit offset of the byte lane selected by the low two address bits.
pub const fn byte_shift(addr: u32) -> u32 {
    (addr & 3) << 3
}
