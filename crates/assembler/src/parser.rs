//! Parser for tokenized IPPcode24 lines → instruction records.
//!
//! Operand forms are checked against the opcode's signature so that a
//! source file with the wrong operands is rejected before any record
//! exists.

use crate::error::AsmError;
use crate::lexer::Token;
use ipp_common::{Opcode, OperandKind, RawArgument, RawInstruction};

/// Parse the tokens of one line into a record with the given order.
///
/// Returns `Ok(None)` for an empty token list.
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
    order: u32,
) -> Result<Option<RawInstruction>, AsmError> {
    let Some((first, operands)) = tokens.split_first() else {
        return Ok(None);
    };

    let opcode = match first {
        Token::Identifier(word) | Token::TypeName(word) => Opcode::from_mnemonic(word)
            .ok_or_else(|| AsmError::UnknownOpcode {
                line: line_num,
                token: word.clone(),
            })?,
        other => {
            return Err(AsmError::InvalidToken {
                line: line_num,
                token: other.text(),
            })
        }
    };

    let signature = opcode.operands();
    if operands.len() != signature.len() {
        return Err(AsmError::OperandCount {
            line: line_num,
            opcode,
            expected: signature.len(),
            found: operands.len(),
        });
    }

    let args = operands
        .iter()
        .zip(signature)
        .enumerate()
        .map(|(i, (token, &kind))| {
            operand(token, kind, i + 1).ok_or_else(|| AsmError::OperandMismatch {
                line: line_num,
                opcode,
                position: i + 1,
                expected: kind,
                token: token.text(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(RawInstruction::new(order, opcode.mnemonic(), args)))
}

/// Build the argument record for `token` if it fits `kind`.
fn operand(token: &Token, kind: OperandKind, position: usize) -> Option<RawArgument> {
    match (kind, token) {
        (OperandKind::Var | OperandKind::Symb, Token::Variable(v)) => {
            Some(RawArgument::new(position, "var", v))
        }
        (OperandKind::Symb, Token::Literal(dt, v)) => {
            Some(RawArgument::new(position, dt.name(), v))
        }
        (OperandKind::Label, Token::Identifier(name) | Token::TypeName(name)) => {
            Some(RawArgument::new(position, "label", name))
        }
        (OperandKind::Type, Token::TypeName(name)) => Some(RawArgument::new(position, "type", name)),
        _ => None,
    }
}
