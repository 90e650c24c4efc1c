//! Alias identifiers backed by string interning.
//!
//! Relationship lines refer to elements by alias, and the same alias is
//! usually looked up many times during one parse. [`Id`] interns the alias
//! text once so lookups and comparisons are symbol comparisons.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for alias storage.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; the interner is append-only.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Interned identifier used as an alias table key.
///
/// # Examples
///
/// ```
/// use umlbridge_core::identifier::Id;
///
/// let by_alias = Id::new("UC01");
/// let by_name = Id::new("Start game");
///
/// assert_eq!(by_alias, "UC01");
/// assert_ne!(by_alias, by_name);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from an alias or display name.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns the `Id` for `name` only if it was interned before.
    ///
    /// Lookups of names that never appeared as a declaration can therefore
    /// skip the alias table entirely.
    pub fn lookup(name: &str) -> Option<Self> {
        with_interner(|interner| interner.get(name)).map(Self)
    }

    fn with_str<R>(self, f: impl FnOnce(&str) -> R) -> R {
        with_interner(|interner| f(interner.resolve(self.0).unwrap_or_default()))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.with_str(str::to_owned);
        f.write_str(&text)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|text| text == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
