//! Schema-driven selection of fields from JSON values.

use anyhow::{Context, Result};
use core::fmt::{Formatter, Result as FmtResult};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;
use thiserror::Error;

const FULL_REPORT_YAML: &str = include_str!("../../schemas/full_report.yaml");
const NEW_REPOS_REPORT_YAML: &str = include_str!("../../schemas/new_repos_report.yaml");

/// Declared type of a projected leaf. Values are copied as-is; the tag documents the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldType {
    Int,
    Float,
    Str,
    Bool,
    Dict,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Field(FieldType),
    Nested(Schema),
}

/// Field names mapped to either a type tag or a nested schema, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<(String, SchemaNode)>);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("missing key '{key}' in object with keys [{available}]")]
    MissingKey { key: String, available: String },

    #[error("cannot select '{key}' from a {found} value")]
    NotAnObject { key: String, found: &'static str },
}

impl Schema {
    #[must_use]
    pub fn new(fields: Vec<(String, SchemaNode)>) -> Self {
        Self(fields)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing projection schema")
    }

    /// Fields the full-year report context reads.
    pub fn full_report() -> Result<Self> {
        Self::from_yaml(FULL_REPORT_YAML)
    }

    /// Fields the new-repositories report context reads.
    pub fn new_repos_report() -> Result<Self> {
        Self::from_yaml(NEW_REPOS_REPORT_YAML)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Selects the schema's fields from `value`.
    ///
    /// Arrays are projected element by element. Nested schemas recurse into the field's value;
    /// type tags copy it verbatim. Output fields follow the schema's order.
    pub fn project(&self, value: &Value) -> Result<Value, ProjectionError> {
        if let Value::Array(items) = value {
            return items.iter().map(|item| self.project(item)).collect::<Result<Vec<_>, _>>().map(Value::Array);
        }

        let mut projected = Map::new();
        for (key, node) in &self.0 {
            let object = value.as_object().ok_or_else(|| ProjectionError::NotAnObject {
                key: key.clone(),
                found: kind_of(value),
            })?;

            let field = object.get(key).ok_or_else(|| ProjectionError::MissingKey {
                key: key.clone(),
                available: object.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
            })?;

            let field = match node {
                SchemaNode::Field(_) => field.clone(),
                SchemaNode::Nested(schema) => schema.project(field)?,
            };
            let _ = projected.insert(key.clone(), field);
        }

        Ok(Value::Object(projected))
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = Schema;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> FmtResult {
                formatter.write_str("a map of field names to type tags or nested schemas")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, node)) = access.next_entry::<String, SchemaNode>()? {
                    fields.push((name, node));
                }
                Ok(Schema(fields))
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(text: &str) -> Schema {
        Schema::from_yaml(text).unwrap()
    }

    #[test]
    fn test_selects_listed_fields() {
        let projected = schema("a: int").project(&json!({ "a": 1, "b": 2 })).unwrap();
        assert_eq!(projected, json!({ "a": 1 }));
    }

    #[test]
    fn test_missing_key_names_the_key() {
        let err = schema("c: int").project(&json!({ "a": 1, "b": 2 })).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::MissingKey {
                key: "c".to_string(),
                available: "a, b".to_string(),
            }
        );
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_nested_schema_maps_over_lists() {
        let value = json!({
            "repos": [
                { "name": "x", "commits_num": 3, "url": "u1" },
                { "name": "y", "commits_num": 0, "url": "u2" },
            ],
            "other": true,
        });
        let projected = schema("repos:\n  name: str\n  commits_num: int").project(&value).unwrap();

        assert_eq!(
            projected,
            json!({ "repos": [{ "name": "x", "commits_num": 3 }, { "name": "y", "commits_num": 0 }] })
        );
    }

    #[test]
    fn test_nested_missing_key_fails_whole_projection() {
        let value = json!({ "repos": [{ "name": "x" }, { "title": "y" }] });
        let err = schema("repos:\n  name: str").project(&value).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingKey { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_nested_schema_on_scalar() {
        let err = schema("a:\n  b: int").project(&json!({ "a": 5 })).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::NotAnObject {
                key: "b".to_string(),
                found: "number",
            }
        );
    }

    #[test]
    fn test_output_follows_schema_order() {
        let projected = schema("z: int\na: int").project(&json!({ "a": 1, "z": 2 })).unwrap();
        let keys: Vec<_> = projected.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_values_are_not_coerced() {
        let projected = schema("a: int").project(&json!({ "a": "not a number" })).unwrap();
        assert_eq!(projected, json!({ "a": "not a number" }));
    }

    #[test]
    fn test_bundled_schemas_parse() {
        let full = Schema::full_report().unwrap();
        assert!(full.fields().any(|(name, node)| name == "repos_details" && matches!(node, SchemaNode::Nested(_))));

        let new_repos = Schema::new_repos_report().unwrap();
        assert_eq!(new_repos.fields().map(|(name, _)| name).collect::<Vec<_>>(), vec!["languages_num"]);
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        assert!(Schema::from_yaml("a: integer").is_err());
    }
}
