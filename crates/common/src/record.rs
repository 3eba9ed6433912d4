//! Raw instruction records: the loader's input.
//!
//! Records mirror the markup the program format comes from, so every field is
//! kept as text and nothing is validated here. The loader decides what is
//! well-formed.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Language identifier a program document must declare.
pub const LANGUAGE: &str = "IPPcode24";

/// A whole program document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProgram {
    /// Declared language. Absent means not checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Instruction records in arrival order.
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

/// One element of the instruction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstruction {
    /// Element name; anything but `instruction` is rejected.
    #[serde(default = "default_element")]
    pub element: String,
    #[serde(
        default,
        deserialize_with = "order_as_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opcode: Option<String>,
    #[serde(default)]
    pub args: Vec<RawArgument>,
}

/// One argument element (`arg1`, `arg2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArgument {
    /// Position name such as `arg2`.
    pub element: String,
    /// Data-type tag.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Text content.
    #[serde(default, deserialize_with = "text_or_scalar")]
    pub value: String,
}

fn default_element() -> String {
    "instruction".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(s: Scalar) -> String {
        match s {
            Scalar::Text(t) => t,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => format!("{f:?}"),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// An order may be any JSON value; the loader rejects what is not a
/// positive integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderField {
    Scalar(Scalar),
    Structured(IgnoredAny),
}

fn order_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OrderField>::deserialize(deserializer)?.map(|field| match field {
            OrderField::Scalar(s) => String::from(s),
            OrderField::Structured(_) => "<structured>".to_string(),
        }),
    )
}

fn text_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

impl RawInstruction {
    /// Build a well-shaped record.
    pub fn new(order: u32, opcode: &str, args: Vec<RawArgument>) -> Self {
        Self {
            element: default_element(),
            order: Some(order.to_string()),
            opcode: Some(opcode.to_string()),
            args,
        }
    }
}

impl RawArgument {
    /// Build an argument record for a 1-based position.
    pub fn new(position: usize, data_type: &str, value: &str) -> Self {
        Self {
            element: format!("arg{position}"),
            data_type: Some(data_type.to_string()),
            value: value.to_string(),
        }
    }
}

impl RawProgram {
    /// A document declaring the expected language.
    pub fn new(instructions: Vec<RawInstruction>) -> Self {
        Self {
            language: Some(LANGUAGE.to_string()),
            instructions,
        }
    }
}
