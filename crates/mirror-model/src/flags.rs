use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// JVM access flags of a type or member.
///
/// The engine only interprets `ABSTRACT` and `INTERFACE`; every other bit is
/// carried through untouched.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(u16);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const PUBLIC: Flags = Flags(0x0001);
    pub const PRIVATE: Flags = Flags(0x0002);
    pub const PROTECTED: Flags = Flags(0x0004);
    pub const STATIC: Flags = Flags(0x0008);
    pub const FINAL: Flags = Flags(0x0010);
    pub const VARARGS: Flags = Flags(0x0080);
    pub const INTERFACE: Flags = Flags(0x0200);
    pub const ABSTRACT: Flags = Flags(0x0400);

    pub const fn from_bits(bits: u16) -> Self {
        Flags(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn without(self, other: Flags) -> Flags {
        Flags(self.0 & !other.0)
    }

    pub fn is_public(self) -> bool {
        self.contains(Flags::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Flags::STATIC)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Flags::ABSTRACT)
    }

    pub fn is_interface(self) -> bool {
        self.contains(Flags::INTERFACE)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: &[(Flags, &str)] = &[
            (Flags::PUBLIC, "public"),
            (Flags::PRIVATE, "private"),
            (Flags::PROTECTED, "protected"),
            (Flags::STATIC, "static"),
            (Flags::FINAL, "final"),
            (Flags::VARARGS, "varargs"),
            (Flags::INTERFACE, "interface"),
            (Flags::ABSTRACT, "abstract"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Flags({:#06x}: {})", self.0, names.join(" "))
    }
}
