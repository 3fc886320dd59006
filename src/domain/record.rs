//! Input records of the instrument lineage.

use serde::{Deserialize, Deserializer};

/// Parent name marking the root record.
pub const ROOT_SENTINEL: &str = "root";

/// One parsed entry of the lineage input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(rename = "parent")]
    pub parent_name: String,
    #[serde(
        rename = "dataAvailable",
        default,
        deserialize_with = "deserialize_flag"
    )]
    pub data_available: bool,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, parent_name: impl Into<String>, data_available: bool) -> Self {
        Self {
            name: name.into(),
            parent_name: parent_name.into(),
            data_available,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_name == ROOT_SENTINEL
    }
}

/// Lineage data stores the flag as `"true"`/`"false"`; plain booleans are accepted too.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Text(s)) => Ok(s.trim().eq_ignore_ascii_case("true")),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_string_flag_when_deserializing_then_parses_true() {
        let record: NodeRecord =
            serde_json::from_str(r#"{"name":"Grand Piano","parent":"Piano","dataAvailable":"true"}"#)
                .unwrap();
        assert!(record.data_available);
        assert_eq!(record.parent_name, "Piano");
    }

    #[test]
    fn given_missing_or_bool_flag_when_deserializing_then_defaults() {
        let missing: NodeRecord = serde_json::from_str(r#"{"name":"Lyre","parent":"root"}"#).unwrap();
        assert!(!missing.data_available);
        assert!(missing.is_root());

        let boolean: NodeRecord =
            serde_json::from_str(r#"{"name":"Lyre","parent":"root","dataAvailable":true}"#).unwrap();
        assert!(boolean.data_available);

        let null: NodeRecord =
            serde_json::from_str(r#"{"name":"Lyre","parent":"root","dataAvailable":null}"#).unwrap();
        assert!(!null.data_available);
    }
}
