//! Common serde helpers for record ids
//!
//! Record ids are accepted in two shapes during deserialization:
//! - string form `"table:id"` (API JSON)
//! - SurrealDB native form (rows coming back from the database)
//!
//! Serialization always emits the `"table:id"` string form.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Internal helper accepting both string and native RecordId formats
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // Delegate to the native RecordId deserializer
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// RecordId serialization as "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlexibleRecordId::deserialize(d).map(|f| f.0)
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use surrealdb::RecordId;

    #[derive(Serialize, Deserialize)]
    struct Doc {
        #[serde(default, with = "super::option_record_id")]
        id: Option<RecordId>,
        #[serde(with = "super::record_id")]
        owner: RecordId,
    }

    #[test]
    fn serializes_as_table_colon_id() {
        let doc = Doc {
            id: Some(RecordId::from_table_key("order", "abc123")),
            owner: RecordId::from_table_key("customer", "xyz"),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""id":"order:abc123""#));
        assert!(json.contains(r#""owner":"customer:xyz""#));
    }

    #[test]
    fn deserializes_from_string_form() {
        let doc: Doc =
            serde_json::from_str(r#"{"id":"order:abc123","owner":"customer:xyz"}"#).unwrap();
        assert_eq!(doc.id.unwrap().to_string(), "order:abc123");
        assert_eq!(doc.owner.to_string(), "customer:xyz");
    }

    #[test]
    fn missing_optional_id_is_none() {
        let doc: Doc = serde_json::from_str(r#"{"owner":"customer:xyz"}"#).unwrap();
        assert!(doc.id.is_none());
    }

    #[test]
    fn rejects_malformed_id() {
        let result = serde_json::from_str::<Doc>(r#"{"owner":"no-table-part"}"#);
        assert!(result.is_err());
    }
}
