//! Shared types used across the codebase

use serde::{Deserialize, Deserializer};

/// A single field of a partial update.
///
/// Request bodies mark each patch field `#[serde(default)]`, so a key that is
/// missing from the JSON stays [`Patch::Absent`], an explicit `null` becomes
/// [`Patch::Null`] and anything else is [`Patch::Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

// No `T: Default` bound.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// Apply to a non-nullable field. `Null` never reaches here: request
    /// validation rejects it first.
    pub fn apply_to(self, slot: &mut T) {
        if let Patch::Value(v) = self {
            *slot = v;
        }
    }

    /// Apply to a nullable field; `Null` clears it.
    pub fn apply_to_option(self, slot: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
