//! Provenance flags recording how a property's value was set.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of the sources that supplied a property's current value.
///
/// Flags accumulate across the capture pipeline. `DEFAULT` and `ENV` are not
/// authoritative: [`Flags::important`] strips them when deciding whether a
/// nested capture actually produced anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// The property has not been changed.
    pub const NONE: Flags = Flags(0);
    /// The value was taken from command-line arguments.
    pub const ARGS: Flags = Flags(1);
    /// The value was entered at a prompt.
    pub const PROMPT: Flags = Flags(1 << 1);
    /// The value was read from an environment variable.
    pub const ENV: Flags = Flags(1 << 2);
    /// The value came from the declared default.
    pub const DEFAULT: Flags = Flags(1 << 3);

    /// True when no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every flag in `other` is set.
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any flag in `other` is set.
    pub fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// Add the flags in `other`.
    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    /// Remove the flags in `other`.
    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    /// The flags with the non-authoritative `DEFAULT` and `ENV` removed.
    pub fn important(self) -> Flags {
        Flags(self.0 & !(Flags::DEFAULT.0 | Flags::ENV.0))
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Flags::ARGS, "ARGS"),
            (Flags::PROMPT, "PROMPT"),
            (Flags::ENV, "ENV"),
            (Flags::DEFAULT, "DEFAULT"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            write!(f, "Flags(NONE)")
        } else {
            write!(f, "Flags({})", names.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_important_strips_seeded_sources() {
        let flags = Flags::DEFAULT | Flags::ENV;
        assert!(!flags.is_empty());
        assert!(flags.important().is_empty());

        let flags = Flags::DEFAULT | Flags::ARGS;
        assert_eq!(flags.important(), Flags::ARGS);
    }

    #[test]
    fn test_insert_remove() {
        let mut flags = Flags::NONE;
        flags.insert(Flags::PROMPT);
        flags |= Flags::ENV;
        assert!(flags.contains(Flags::PROMPT | Flags::ENV));
        assert!(flags.intersects(Flags::ARGS | Flags::ENV));

        flags.remove(Flags::ENV);
        assert_eq!(flags, Flags::PROMPT);
    }

    #[test]
    fn test_debug_lists_names() {
        assert_eq!(format!("{:?}", Flags::NONE), "Flags(NONE)");
        assert_eq!(
            format!("{:?}", Flags::ARGS | Flags::DEFAULT),
            "Flags(ARGS | DEFAULT)"
        );
    }
}
