//! Runtime value representation and the value-model rules shared by every
//! operator: literal coercion, classification, comparison and output
//! formatting.

use crate::data_type::DataType;
use crate::error::ValueError;
use std::cmp::Ordering;
use std::fmt;

/// Runtime value held in a variable or on the data stack.
///
/// A declared variable that was never assigned has no `Value` at all; the
/// frame store models that state separately.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// String as stored. `\ddd` escapes are decoded only when written out.
    Str(String),
    Nil,
}

/// Dynamic class of a value, used for operand-type dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Int,
    Float,
    Bool,
    String,
    Nil,
}

impl ValueClass {
    /// Symbolic type name as produced by TYPE.
    pub fn name(&self) -> &'static str {
        match self {
            ValueClass::Int => "int",
            ValueClass::Float => "float",
            ValueClass::Bool => "bool",
            ValueClass::String => "string",
            ValueClass::Nil => "nil",
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Floats compare by bit pattern so `Value` can be `Eq`. Program-level
// equality (EQ, JUMPIFEQ) goes through `equals`, which compares numerically.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns the dynamic class of this value.
    pub fn class(&self) -> ValueClass {
        match self {
            Value::Int(_) => ValueClass::Int,
            Value::Float(_) => ValueClass::Float,
            Value::Bool(_) => ValueClass::Bool,
            Value::Str(_) => ValueClass::String,
            Value::Nil => ValueClass::Nil,
        }
    }

    /// Convert an argument's raw text into a value of its declared type.
    ///
    /// `bool` maps exactly `"true"` to true and anything else to false.
    /// `string` is stored verbatim.
    pub fn from_literal(data_type: DataType, raw: &str) -> Result<Value, ValueError> {
        let invalid = || ValueError::InvalidLiteral {
            data_type,
            raw: raw.to_string(),
        };
        match data_type {
            DataType::Int => parse_int(raw).map(Value::Int).ok_or_else(invalid),
            DataType::Float => parse_float(raw).map(Value::Float).ok_or_else(invalid),
            DataType::Bool => Ok(Value::Bool(raw == "true")),
            DataType::String => Ok(Value::Str(raw.to_string())),
            DataType::Nil => Ok(Value::Nil),
            DataType::Type | DataType::Label | DataType::Var => {
                Err(ValueError::NotAValue(data_type))
            }
        }
    }

    /// Format for WRITE and DPRINT.
    pub fn to_output(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_hex_float(*f),
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => decode_escapes(s),
            Value::Nil => String::new(),
        }
    }
}

/// Equality under the EQ rule.
///
/// Operands must share a class, except that `nil` may be compared with
/// anything (and equals only `nil`).
pub fn equals(a: &Value, b: &Value) -> Result<bool, ValueError> {
    match (a, b) {
        (Value::Nil, _) | (_, Value::Nil) => Ok(matches!((a, b), (Value::Nil, Value::Nil))),
        (Value::Float(x), Value::Float(y)) => Ok(x == y),
        _ if a.class() == b.class() => Ok(a == b),
        _ => Err(ValueError::ClassMismatch {
            left: a.class(),
            right: b.class(),
        }),
    }
}

/// Ordering under the LT/GT rule: same class, never `nil`.
///
/// Booleans order `false < true`; strings order by code point.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, ValueError> {
    match (a, b) {
        (Value::Nil, _) | (_, Value::Nil) => Err(ValueError::NilOrdering),
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => Ok(x.partial_cmp(y).unwrap_or(Ordering::Equal)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(x.chars().cmp(y.chars())),
        _ => Err(ValueError::ClassMismatch {
            left: a.class(),
            right: b.class(),
        }),
    }
}

/// Parse an integer literal: optional sign, then decimal, `0x` hex or `0o` octal.
pub fn parse_int(raw: &str) -> Option<i64> {
    let text = raw.trim();
    let (sign, rest) = match text.as_bytes().first()? {
        b'-' => ("-", &text[1..]),
        b'+' => ("", &text[1..]),
        _ => ("", text),
    };
    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or(rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(oct) = rest.strip_prefix("0o").or(rest.strip_prefix("0O")) {
        (8, oct)
    } else {
        (10, rest)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

/// Parse a float literal in C99 hex notation (`0x1.8p+1`) or decimal.
pub fn parse_float(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let value = match rest.strip_prefix("0x").or(rest.strip_prefix("0X")) {
        Some(hex) => parse_hex_float_body(hex)?,
        None => {
            let decimal = rest
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
            if !decimal || rest.starts_with(['+', '-']) {
                return None;
            }
            rest.parse::<f64>().ok()?
        }
    };
    Some(if negative { -value } else { value })
}

fn parse_hex_float_body(body: &str) -> Option<f64> {
    let (mantissa, exponent) = match body.find(['p', 'P']) {
        Some(pos) => (&body[..pos], body[pos + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0.0f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    // Split the scaling so subnormal results do not underflow early.
    let half = exponent / 2;
    Some(value * 2f64.powi(half) * 2f64.powi(exponent - half))
}

/// Format a float the way C's `%a` does.
pub fn format_hex_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}inf");
    }

    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = bits & ((1u64 << 52) - 1);

    if biased == 0 && mantissa == 0 {
        return format!("{sign}0x0p+0");
    }
    let (lead, exponent) = if biased == 0 {
        (0, -1022)
    } else {
        (1, biased - 1023)
    };

    let digits = format!("{mantissa:013x}");
    let frac = digits.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}0x{lead}p{exponent:+}")
    } else {
        format!("{sign}0x{lead}.{frac}p{exponent:+}")
    }
}

/// Parse the escape body that follows a backslash.
///
/// Two forms are accepted: `ddd` (three decimal digits) and `u{h}` (one to
/// six hex digits). Returns the character and the body's length in bytes.
pub fn parse_escape(body: &str) -> Option<(char, usize)> {
    if let Some(digits) = body.get(..3).filter(|d| d.bytes().all(|b| b.is_ascii_digit())) {
        let c = digits.parse::<u32>().ok().and_then(char::from_u32)?;
        return Some((c, 3));
    }
    let hex = body.strip_prefix("u{")?;
    let end = hex.find('}')?;
    let digits = &hex[..end];
    if digits.is_empty() || digits.len() > 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let c = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
    Some((c, end + 3))
}

/// Decode `\ddd` and `\u{h}` escapes into the characters they name.
///
/// A backslash that does not start a valid escape is kept as-is.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let body = &rest[pos + 1..];
        match parse_escape(body) {
            Some((c, len)) => {
                out.push(c);
                rest = &body[len..];
            }
            None => {
                out.push('\\');
                rest = body;
            }
        }
    }
    out.push_str(rest);

    out
}
