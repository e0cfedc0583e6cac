//! Identifier management using string interning.
//!
//! Node and edge identifiers arrive from the canvas as strings and are compared
//! and hashed constantly during layout, routing and linting. [`Id`] interns
//! them once so they become `Copy` and cheap to compare.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier of a node or an edge.
///
/// Serializes as the plain string it was created from.
///
/// # Examples
///
/// ```
/// use skyplan_core::identifier::Id;
///
/// let web = Id::new("web-app");
/// let same = Id::new("web-app");
/// assert_eq!(web, same);
/// assert_eq!(web, "web-app");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns an owned copy of the identifier's text.
    pub fn to_text(self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// Stable hash of the identifier text.
    ///
    /// Depends only on the characters of the identifier, never on interning
    /// order or process state, so it can seed deterministic geometry.
    ///
    /// ```
    /// use skyplan_core::identifier::Id;
    ///
    /// assert_eq!(Id::new("edge-1").stable_hash(), Id::new("edge-1").stable_hash());
    /// ```
    pub fn stable_hash(self) -> u32 {
        self.to_text()
            .chars()
            .fold(0u32, |hash, ch| hash.wrapping_mul(31).wrapping_add(ch as u32))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let value = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::new(&text))
    }
}
