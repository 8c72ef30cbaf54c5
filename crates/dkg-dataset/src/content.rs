use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DatasetError;

/// One set of triples in any of the accepted input forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TripleSource {
    /// N-Quads document, one statement per line.
    NQuads(String),
    /// N-Quads statements, one per entry.
    Lines(Vec<String>),
    /// JSON-LD node object, array of node objects, or `@graph` document.
    JsonLd(Value),
}

impl TripleSource {
    fn from_value(value: Value) -> Result<Option<Self>, DatasetError> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(Self::NQuads(text))),
            Value::Array(items) if items.iter().all(Value::is_string) => {
                let lines = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(line) => Some(line),
                        _ => None,
                    })
                    .collect();
                Ok(Some(Self::Lines(lines)))
            }
            value @ (Value::Array(_) | Value::Object(_)) => Ok(Some(Self::JsonLd(value))),
            other => Err(DatasetError::validation(format!(
                "expected N-Quads text, a list of N-Quads lines or a JSON-LD object, got {other}"
            ))),
        }
    }
}

/// Content submitted for publishing.
///
/// Deserializes from either a bare triple source or an object with `public`
/// and/or `private` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Content {
    pub public: Option<TripleSource>,
    pub private: Option<TripleSource>,
}

impl Content {
    pub fn public(source: TripleSource) -> Self {
        Self {
            public: Some(source),
            private: None,
        }
    }

    pub fn with_private(public: TripleSource, private: TripleSource) -> Self {
        Self {
            public: Some(public),
            private: Some(private),
        }
    }
}

impl TryFrom<Value> for Content {
    type Error = DatasetError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(mut map) if is_split_object(&map) => {
                let public = map.remove("public").unwrap_or(Value::Null);
                let private = map.remove("private").unwrap_or(Value::Null);
                if let Some(key) = map.keys().next() {
                    return Err(DatasetError::validation(format!(
                        "unexpected key '{key}' next to public/private content"
                    )));
                }
                Ok(Self {
                    public: TripleSource::from_value(public)?,
                    private: TripleSource::from_value(private)?,
                })
            }
            other => Ok(Self {
                public: TripleSource::from_value(other)?,
                private: None,
            }),
        }
    }
}

fn is_split_object(map: &serde_json::Map<String, Value>) -> bool {
    (map.contains_key("public") || map.contains_key("private"))
        && !map.keys().any(|key| key.starts_with('@'))
}
