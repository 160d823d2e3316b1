use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable public-key reference to a peer. Persists across roster refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Wrap a stable peer identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Ordinal → identity binding observed in one roster snapshot.
///
/// Kept by the score tracker purely to detect churn: an ordinal that now
/// points to a different identity than last epoch has been replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityTable(Vec<Identity>);

impl IdentityTable {
    /// Table where position `i` holds the identity of ordinal `i`.
    pub fn new(identities: Vec<Identity>) -> Self {
        Self(identities)
    }

    /// Number of ordinals bound.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identity bound to `ordinal`, if in range.
    pub fn get(&self, ordinal: usize) -> Option<&Identity> {
        self.0.get(ordinal)
    }

    /// Identities in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Identity] {
        &self.0
    }

    /// Unwrap into the ordinal-ordered vector.
    pub fn into_inner(self) -> Vec<Identity> {
        self.0
    }
}

impl FromIterator<Identity> for IdentityTable {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
