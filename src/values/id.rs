//! Numeric identifier encodings.
//!
//! Legacy endpoints return identifiers as strings (`"id": "123"`) and use
//! zero to mean "no value" for optional foreign keys. Current endpoints use
//! plain numbers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(i64),
    Text(String),
}

impl RawNumber {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(0);
                }
                text.parse()
                    .map_err(|_| E::custom(format!("invalid numeric id '{text}'")))
            }
        }
    }
}

/// A number that legacy endpoints may send as a string.
///
/// `null` and `""` read as zero. Always encodes as a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyNumber(pub i64);

impl LegacyNumber {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LegacyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for LegacyNumber {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

impl Serialize for LegacyNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for LegacyNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<RawNumber>::deserialize(deserializer)? {
            Some(raw) => raw.into_i64().map(Self),
            None => Ok(Self(0)),
        }
    }
}

/// Serde adapter for optional ids where zero means absent.
///
/// `0`, `"0"`, `""` and `null` all decode to `None`. `Some(n)` encodes as
/// the number `n`. Pair with `skip_serializing_if = "Option::is_none"` so
/// `None` is omitted on encode.
///
/// ```
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     #[serde(
///         default,
///         with = "twapi::values::zero_as_none",
///         skip_serializing_if = "Option::is_none"
///     )]
///     company_id: Option<i64>,
/// }
///
/// let person: Person = serde_json::from_str(r#"{"company_id": "0"}"#).unwrap();
/// assert!(person.company_id.is_none());
/// ```
pub mod zero_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::RawNumber;

    pub fn serialize<S: Serializer>(
        value: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => serializer.serialize_i64(*n),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<RawNumber>::deserialize(deserializer)? {
            Some(raw) => {
                let n = raw.into_i64()?;
                Ok((n != 0).then_some(n))
            }
            None => Ok(None),
        }
    }
}
