//! Interned identifiers and string literals.
//!
//! A procedure owns its interner: every identifier, property name and string
//! literal in the source is stored once and referred to by [`Name`]. Names
//! compare in O(1), which keeps the extractor's "is this the state
//! parameter?" checks trivial.

use rustc_hash::FxHashMap;
use std::fmt;

/// Interned string handle, valid for the interner that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Append-only string table.
#[derive(Clone, Debug)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = StringInterner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(32),
        };
        interner.intern("");
        interner
    }

    /// Intern `s`, returning the existing handle if it was seen before.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let index = u32::try_from(self.strings.len()).unwrap_or(u32::MAX);
        let name = Name(index);
        self.strings.push(s.into());
        self.map.insert(s.into(), name);
        name
    }

    /// Look up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.map.get(s).copied()
    }

    /// Resolve a handle back to its text.
    ///
    /// Handles from another interner resolve to `""`.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.index()).map_or("", |s| s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
