//! Variable namespace: YAML values plus the injected environment.
//!
//! Values are loaded first; [`crate::env::inject`] runs afterwards and
//! overwrites any top-level key it shares with the values document.

use std::io::Read;

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;

use tmplhate_core::CaseConvention;

use crate::error::RenderError;

/// Top-level mapping handed to the template engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    vars: Map<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a values document. The root must be a mapping; an empty
    /// document or `null` is an empty mapping. Only the first document of a
    /// `---` stream is read.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, RenderError> {
        let doc = if bytes.iter().all(u8::is_ascii_whitespace) {
            Yaml::Null
        } else {
            match serde_yaml::Deserializer::from_slice(bytes).next() {
                Some(first) => Yaml::deserialize(first).map_err(RenderError::ValuesParse)?,
                None => Yaml::Null,
            }
        };
        let mapping = match doc {
            Yaml::Null => return Ok(Self::new()),
            Yaml::Mapping(mapping) => mapping,
            Yaml::Tagged(tagged) => match tagged.value {
                Yaml::Mapping(mapping) => mapping,
                other => return Err(RenderError::ValuesNotMapping { found: yaml_kind(&other) }),
            },
            other => return Err(RenderError::ValuesNotMapping { found: yaml_kind(&other) }),
        };

        let mut vars = Map::new();
        for (key, value) in mapping {
            vars.insert(key_string(&key)?, yaml_to_json(value)?);
        }
        Ok(Namespace { vars })
    }

    /// Read a values stream to completion, release it, and parse it.
    /// `None` yields an empty namespace.
    pub fn load(
        reader: Option<Box<dyn Read>>,
        location: &str,
        case: Option<CaseConvention>,
    ) -> Result<Self, RenderError> {
        let Some(reader) = reader else {
            tracing::debug!("no values source; starting from an empty namespace");
            return Ok(Self::new());
        };
        let bytes = tmplhate_core::source::read_all(reader, location)?;
        let mut ns = Self::from_yaml(&bytes)?;
        if let Some(case) = case {
            ns.normalize_keys(case);
        }
        tracing::debug!(keys = ns.len(), "values loaded");
        Ok(ns)
    }

    /// Add every top-level key again under its `case` spelling. Original
    /// keys stay; a normalized spelling overwrites an original key it
    /// collides with, and among keys normalizing alike the later one in
    /// document order wins. Nested mappings keep their keys.
    pub fn normalize_keys(&mut self, case: CaseConvention) {
        let normalized: Vec<(String, Value)> = self
            .vars
            .iter()
            .map(|(k, v)| (case.apply(k), v.clone()))
            .collect();
        for (key, value) in normalized {
            self.vars.insert(key, value);
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.vars.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_value(Value::Object(self.vars.clone())).map_err(RenderError::Context)
    }
}

impl From<Map<String, Value>> for Namespace {
    fn from(vars: Map<String, Value>) -> Self {
        Namespace { vars }
    }
}

// ---------------------------------------------------------------------------
// YAML -> JSON conversion
// ---------------------------------------------------------------------------

fn yaml_kind(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "bool",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(tagged) => yaml_kind(&tagged.value),
    }
}

/// Scalar keys are spelled as they would print; `1: x` is key `"1"`.
fn key_string(key: &Yaml) -> Result<String, RenderError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => key_string(&tagged.value),
        other => Err(RenderError::UnsupportedKey { found: yaml_kind(other) }),
    }
}

fn yaml_to_json(value: Yaml) -> Result<Value, RenderError> {
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // `.nan` and `.inf` have no JSON number; keep their YAML spelling.
                match n.as_f64().and_then(Number::from_f64) {
                    Some(f) => Value::Number(f),
                    None => Value::String(n.to_string()),
                }
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                map.insert(key_string(&k)?, yaml_to_json(v)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
