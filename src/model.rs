use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ── Raw (scraped) shapes ──

/// One recipe as scraped, before normalization. Every field is optional so
/// any subset of keys in the intermediate file is accepted. A value of an
/// unexpected type reads as absent; list entries of the wrong type are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RawIngredient>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<RawInstructions>,
    #[serde(
        rename = "cookingTime",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub cooking_time_minutes: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub servings: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// An ingredient line is either already split into fields or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawIngredient {
    Structured {
        #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
        quantity: Option<RawScalar>,
        #[serde(
            rename = "isAvailable",
            default,
            deserialize_with = "lenient",
            skip_serializing_if = "Option::is_none"
        )]
        is_available: Option<bool>,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInstructions {
    Many(Vec<String>),
    One(String),
}

/// A loosely typed scalar: `30`, `"30분"`, `4.0` and `true` are all seen in
/// scraped data for the numeric-ish fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawScalar::Int(n) => write!(f, "{}", n),
            RawScalar::Float(x) => write!(f, "{}", x),
            RawScalar::Bool(b) => write!(f, "{}", b),
            RawScalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawScalar {
    fn from(s: &str) -> Self {
        RawScalar::Text(s.to_string())
    }
}

/// `None` when the value does not fit `T`, instead of failing the record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Keeps the entries that fit `T`; a non-array value reads as `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(Some(
            items.into_iter().filter_map(|v| T::deserialize(v).ok()).collect(),
        )),
        _ => Ok(None),
    }
}

// ── Canonical (storable) shapes ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
}

/// Row shape of the `recipes` table. `ingredients` and `instructions` are
/// stored as JSON-encoded text columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    #[serde(serialize_with = "as_json_string")]
    pub ingredients: Vec<Ingredient>,
    #[serde(serialize_with = "as_json_string")]
    pub instructions: Vec<String>,
    pub cooking_time: u32,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub tags: Vec<String>,
    pub created_by: Uuid,
}

fn as_json_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let encoded = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}
