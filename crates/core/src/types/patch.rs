//! Three-state partial-update field.
//!
//! JSON partial updates need to distinguish "field absent" from "field
//! explicitly null". `Option<T>` collapses both into `None`; `Patch<T>`
//! keeps them apart: absence means "leave unchanged", explicit null means
//! "clear".

use serde::{Deserialize, Deserializer, Serialize};

/// A field in a partial-update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field absent from the payload: leave the stored value unchanged.
    #[default]
    Missing,
    /// Field explicitly `null`: clear the stored value.
    Null,
    /// Field present: replace the stored value.
    Value(T),
}

impl<T> Patch<T> {
    /// Resolve this patch against the currently stored value.
    ///
    /// `Missing` keeps `current`, `Null` clears it, `Value` replaces it.
    #[must_use]
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Missing => current,
            Self::Null => None,
            Self::Value(v) => Some(v),
        }
    }
}

// Serde cannot express "absent" directly on the field type, so Patch is
// always used with #[serde(default)]: an absent field deserializes to
// Missing via Default, a present field goes through this impl.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Missing | Self::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        note: Patch<String>,
    }

    #[test]
    fn absent_field_is_missing() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.note, Patch::Missing);
    }

    #[test]
    fn explicit_null_is_null() {
        let body: Body = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(body.note, Patch::Null);
    }

    #[test]
    fn present_field_is_value() {
        let body: Body = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(body.note, Patch::Value("hi".to_owned()));
    }

    #[test]
    fn apply_semantics() {
        let current = Some("old".to_owned());
        assert_eq!(Patch::Missing.apply(current.clone()), current);
        assert_eq!(Patch::<String>::Null.apply(current.clone()), None);
        assert_eq!(
            Patch::Value("new".to_owned()).apply(current),
            Some("new".to_owned())
        );
    }

}
