//! Comma-joined id lists used by legacy endpoints.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Join ids into the comma-separated form used in query strings and legacy
/// payloads.
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A list of ids carried on the wire as one string (`"1,2,3"`).
///
/// Encodes as a comma-joined string (`[]` becomes `""`). Decodes from that
/// string, from a JSON array of numbers, or from `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LegacyNumericList(pub Vec<i64>);

impl LegacyNumericList {
    pub fn new(ids: impl Into<Vec<i64>>) -> Self {
        Self(ids.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i64> {
        self.0.iter()
    }
}

impl From<Vec<i64>> for LegacyNumericList {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for LegacyNumericList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_ids(&self.0))
    }
}

impl FromStr for LegacyNumericList {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for LegacyNumericList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct NumericListVisitor;

impl<'de> Visitor<'de> for NumericListVisitor {
    type Value = LegacyNumericList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a comma-separated string of ids or an array of ids")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LegacyNumericList(vec![v]))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(|v| LegacyNumericList(vec![v]))
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut ids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(id) = seq.next_element::<i64>()? {
            ids.push(id);
        }
        Ok(LegacyNumericList(ids))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LegacyNumericList::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LegacyNumericList::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for LegacyNumericList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_round_trip() {
        let list = LegacyNumericList::default();
        let encoded = serde_json::to_string(&list).unwrap();
        assert_eq!(encoded, "\"\"");

        let decoded: LegacyNumericList = serde_json::from_str(&encoded).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_list_round_trip_keeps_order() {
        let list = LegacyNumericList::new(vec![1, 2, 3]);
        let encoded = serde_json::to_string(&list).unwrap();
        assert_eq!(encoded, "\"1,2,3\"");

        let decoded: LegacyNumericList = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.0, vec![1, 2, 3]);
    }

    #[test]
    fn test_list_decodes_array_and_null() {
        let from_array: LegacyNumericList = serde_json::from_str("[3, 1, 2]").unwrap();
        assert_eq!(from_array.0, vec![3, 1, 2]);

        let from_null: LegacyNumericList = serde_json::from_str("null").unwrap();
        assert!(from_null.is_empty());
    }

    #[test]
    fn test_list_tolerates_spaces_and_trailing_comma() {
        let list: LegacyNumericList = serde_json::from_str("\" 4, 5,\"").unwrap();
        assert_eq!(list.0, vec![4, 5]);
    }

    #[test]
    fn test_list_rejects_non_numeric_entries() {
        assert!(serde_json::from_str::<LegacyNumericList>("\"1,x,3\"").is_err());
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[]), "");
        assert_eq!(join_ids(&[7, 8]), "7,8");
    }
}
