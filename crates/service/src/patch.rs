//! Helpers for partial-update payloads.
//!
//! A nullable field in a PATCH body has three states: absent (keep), `null`
//! (clear) and a value (set). They map onto `Option<Option<T>>` via
//! `#[serde(default, deserialize_with = "patch::double_option")]`.

use serde::{Deserialize, Deserializer};

pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Apply a three-state patch value to `target`.
pub fn apply<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(v) = patch {
        *target = v;
    }
}
