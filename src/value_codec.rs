/*!
 * Structured value codec.
 *
 * Interchange formats only carry text, so non-scalar field values are turned
 * into a string before they are handed to an export target and turned back
 * after import. Two encodings exist:
 *
 * - `json`: readable, editable by translators, key order preserved
 * - `native`: bincode bytes as lowercase hex, opaque and compact
 *
 * Both directions are pure functions returning a typed error; the caller
 * decides whether a failure loses the field or the whole entry.
 */

use std::fmt;
use std::str::FromStr;

use bincode::Options;
use indexmap::IndexMap;
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, Unexpected,
    VariantAccess, Visitor,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::ValueError;

// @struct: Structured field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

/// Encoding used to embed a structured value in a text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueEncoding {
    Native,
    Json,
}

impl ValueEncoding {
    /// Name written into references and XLIFF extradata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ValueEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueEncoding {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "json" => Ok(Self::Json),
            _ => Err(ValueError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Encode a value into text using the given encoding
pub fn encode(value: &FieldValue, encoding: ValueEncoding) -> Result<String, ValueError> {
    match encoding {
        ValueEncoding::Json => {
            let json = to_json(value)?;
            serde_json::to_string(&json).map_err(|e| ValueError::Unrepresentable {
                encoding,
                reason: e.to_string(),
            })
        }
        ValueEncoding::Native => {
            let bytes = bincode::DefaultOptions::new()
                .serialize(value)
                .map_err(|e| ValueError::Unrepresentable {
                    encoding,
                    reason: e.to_string(),
                })?;
            Ok(hex::encode(bytes))
        }
    }
}

/// Decode text produced by [`encode`] back into a value
pub fn decode(text: &str, encoding: ValueEncoding) -> Result<FieldValue, ValueError> {
    let malformed = |reason: String| ValueError::Malformed { encoding, reason };

    match encoding {
        ValueEncoding::Json => {
            let json: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
            Ok(from_json(json))
        }
        ValueEncoding::Native => {
            let bytes = hex::decode(text.trim()).map_err(|e| malformed(e.to_string()))?;
            // The limit keeps a forged length prefix from allocating past the input size
            bincode::DefaultOptions::new()
                .with_limit(bytes.len() as u64)
                .deserialize_seed(NativeSeed { depth: 0 }, &bytes)
                .map_err(|e| malformed(e.to_string()))
        }
    }
}

// @const: Deepest list/map nesting accepted from native text, the bound serde_json applies to JSON
const MAX_NATIVE_DEPTH: usize = 128;

const FIELD_VALUE_VARIANTS: &[&str] = &["Null", "Bool", "Int", "Float", "Text", "List", "Map"];

// Native decoding goes through these seeds instead of the derived impl so
// nesting depth is counted and crafted input cannot exhaust the stack.
#[derive(Clone, Copy)]
struct NativeSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for NativeSeed {
    type Value = FieldValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<FieldValue, D::Error> {
        if self.depth > MAX_NATIVE_DEPTH {
            return Err(de::Error::custom(format!(
                "value nested deeper than {} levels",
                MAX_NATIVE_DEPTH
            )));
        }
        deserializer.deserialize_enum("FieldValue", FIELD_VALUE_VARIANTS, self)
    }
}

impl<'de> Visitor<'de> for NativeSeed {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a field value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<FieldValue, A::Error> {
        let (index, variant) = data.variant::<u32>()?;
        let nested = NativeSeed {
            depth: self.depth + 1,
        };
        match index {
            0 => variant.unit_variant().map(|()| FieldValue::Null),
            1 => variant.newtype_variant().map(FieldValue::Bool),
            2 => variant.newtype_variant().map(FieldValue::Int),
            3 => variant.newtype_variant().map(FieldValue::Float),
            4 => variant.newtype_variant().map(FieldValue::Text),
            5 => variant
                .newtype_variant_seed(ListSeed(nested))
                .map(FieldValue::List),
            6 => variant
                .newtype_variant_seed(MapSeed(nested))
                .map(FieldValue::Map),
            other => Err(de::Error::invalid_value(
                Unexpected::Unsigned(u64::from(other)),
                &"variant index 0 <= i < 7",
            )),
        }
    }
}

struct ListSeed(NativeSeed);

impl<'de> DeserializeSeed<'de> for ListSeed {
    type Value = Vec<FieldValue>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ListSeed {
    type Value = Vec<FieldValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of field values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(item) = seq.next_element_seed(self.0)? {
            items.push(item);
        }
        Ok(items)
    }
}

struct MapSeed(NativeSeed);

impl<'de> DeserializeSeed<'de> for MapSeed {
    type Value = IndexMap<String, FieldValue>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MapSeed {
    type Value = IndexMap<String, FieldValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0).min(1024));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(self.0)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

fn to_json(value: &FieldValue) -> Result<Value, ValueError> {
    Ok(match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Int(i) => Value::Number(Number::from(*i)),
        FieldValue::Float(f) => {
            let number = Number::from_f64(*f).ok_or_else(|| ValueError::Unrepresentable {
                encoding: ValueEncoding::Json,
                reason: format!("non-finite float {}", f),
            })?;
            Value::Number(number)
        }
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::List(items) => {
            Value::Array(items.iter().map(to_json).collect::<Result<Vec<_>, _>>()?)
        }
        FieldValue::Map(map) => {
            let mut object = Map::with_capacity(map.len());
            for (key, item) in map {
                object.insert(key.clone(), to_json(item)?);
            }
            Value::Object(object)
        }
    })
}

fn from_json(json: Value) -> FieldValue {
    match json {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => FieldValue::Text(s),
        Value::Array(items) => FieldValue::List(items.into_iter().map(from_json).collect()),
        Value::Object(object) => FieldValue::Map(
            object
                .into_iter()
                .map(|(key, item)| (key, from_json(item)))
                .collect(),
        ),
    }
}
