//! Structural validation pass.
//!
//! Checks the shape of every raw record (element name, order, opcode,
//! argument names and data-type tags, argument contiguity) and converts the
//! well-formed ones into [`Instruction`]s.

use crate::error::LoadError;
use ipp_common::record::LANGUAGE;
use ipp_common::{Argument, DataType, Instruction, Opcode, RawArgument, RawInstruction, RawProgram};

/// Run the structural pass.
///
/// Returns the instructions that passed, in arrival order, and every error
/// found. A record with any error produces no instruction.
pub fn check_structural(raw: &RawProgram) -> (Vec<Instruction>, Vec<LoadError>) {
    let mut errors = Vec::new();
    let mut instructions = Vec::with_capacity(raw.instructions.len());

    if let Some(language) = &raw.language {
        if !language.eq_ignore_ascii_case(LANGUAGE) {
            errors.push(LoadError::LanguageMismatch {
                found: language.clone(),
            });
        }
    }

    for (index, record) in raw.instructions.iter().enumerate() {
        if let Some(instr) = check_record(index, record, &mut errors) {
            instructions.push(instr);
        }
    }

    (instructions, errors)
}

fn check_record(
    index: usize,
    record: &RawInstruction,
    errors: &mut Vec<LoadError>,
) -> Option<Instruction> {
    if record.element != "instruction" {
        errors.push(LoadError::UnexpectedElement {
            index,
            element: record.element.clone(),
        });
        return None;
    }

    let order = match record.order.as_deref() {
        None => {
            errors.push(LoadError::MissingOrder { index });
            return None;
        }
        Some(text) => match parse_order(text) {
            Some(order) => order,
            None => {
                errors.push(LoadError::InvalidOrder {
                    index,
                    raw: text.to_string(),
                });
                return None;
            }
        },
    };

    let opcode = match record.opcode.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(LoadError::MissingOpcode { at: order });
            None
        }
        Some(text) => {
            let op = Opcode::from_mnemonic(text);
            if op.is_none() {
                errors.push(LoadError::UnknownOpcode {
                    at: order,
                    opcode: text.to_string(),
                });
            }
            op
        }
    };

    let args = check_arguments(order, &record.args, errors);

    Some(Instruction::new(order, opcode?, args?))
}

/// Parse an order attribute: a positive integer.
fn parse_order(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text.strip_prefix('+').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&order| order > 0)
}

/// Parse an argument element name `argN`.
fn parse_position(element: &str) -> Option<usize> {
    let digits = element.strip_prefix("arg")?;
    let position: usize = digits.parse().ok()?;
    (position > 0 && position.to_string() == digits).then_some(position)
}

fn check_arguments(
    at: u32,
    raw_args: &[RawArgument],
    errors: &mut Vec<LoadError>,
) -> Option<Vec<Argument>> {
    let before = errors.len();
    let mut args: Vec<Argument> = Vec::with_capacity(raw_args.len());

    for raw in raw_args {
        let Some(position) = parse_position(&raw.element) else {
            errors.push(LoadError::MalformedArgumentName {
                at,
                element: raw.element.clone(),
            });
            continue;
        };

        let data_type = match raw.data_type.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(LoadError::MissingDataType { at, position });
                continue;
            }
            Some(tag) => match DataType::from_name(tag) {
                Some(dt) => dt,
                None => {
                    errors.push(LoadError::UnknownDataType {
                        at,
                        position,
                        tag: tag.to_string(),
                    });
                    continue;
                }
            },
        };

        if args.iter().any(|a| a.position == position) {
            errors.push(LoadError::DuplicateArgument { at, position });
            continue;
        }

        args.push(Argument::new(position, data_type, raw.value.clone()));
    }

    args.sort_by_key(|a| a.position);
    for (i, arg) in args.iter().enumerate() {
        if arg.position != i + 1 {
            errors.push(LoadError::ArgumentGap { at, missing: i + 1 });
            break;
        }
    }

    (errors.len() == before).then_some(args)
}
