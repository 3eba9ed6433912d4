//! Tokenizer for IPPcode24 source lines.

use crate::error::AsmError;
use ipp_common::value::{parse_escape, parse_float, parse_int};
use ipp_common::DataType;

/// Type names accepted as the second operand of READ.
pub(crate) const TYPE_NAMES: [&str; 4] = ["int", "bool", "string", "float"];

/// A single word of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `GF@x`, kept whole.
    Variable(String),
    /// `type@value`, split at the first `@`.
    Literal(DataType, String),
    /// `int`, `bool`, `string` or `float`.
    TypeName(String),
    /// Opcode mnemonic or label name.
    Identifier(String),
}

impl Token {
    /// Source text of the token.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Variable(s) | Token::TypeName(s) | Token::Identifier(s) => s.clone(),
            Token::Literal(dt, v) => format!("{dt}@{v}"),
        }
    }
}

/// Cut a line at the first `#`.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Tokenize one line that has already had its comment removed.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    line.split_whitespace()
        .map(|word| {
            classify(word).ok_or_else(|| AsmError::InvalidToken {
                line: line_num,
                token: word.to_string(),
            })
        })
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-$&%*!?".contains(c)
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_name_char)
}

/// Every backslash must start a `\ddd` or `\u{h}` escape.
fn valid_escapes(text: &str) -> bool {
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        let body = &rest[pos + 1..];
        match parse_escape(body) {
            Some((_, len)) => rest = &body[len..],
            None => return false,
        }
    }
    true
}

fn classify(word: &str) -> Option<Token> {
    if let Some((prefix, rest)) = word.split_once('@') {
        return match prefix {
            "GF" | "LF" | "TF" if is_name(rest) => Some(Token::Variable(word.to_string())),
            "int" if parse_int(rest).is_some() => Some(literal(DataType::Int, rest)),
            "float" if parse_float(rest).is_some() => Some(literal(DataType::Float, rest)),
            "bool" if rest == "true" || rest == "false" => Some(literal(DataType::Bool, rest)),
            "string" if valid_escapes(rest) => Some(literal(DataType::String, rest)),
            "nil" if rest == "nil" => Some(literal(DataType::Nil, rest)),
            _ => None,
        };
    }
    if TYPE_NAMES.contains(&word) {
        Some(Token::TypeName(word.to_string()))
    } else if is_name(word) {
        Some(Token::Identifier(word.to_string()))
    } else {
        None
    }
}

fn literal(data_type: DataType, value: &str) -> Token {
    Token::Literal(data_type, value.to_string())
}
