//! Main execution loop and opcode dispatch for the IPPcode24 VM.

use crate::error::RuntimeError;
use crate::frames::Frame;
use crate::io::OutputWriter;
use crate::machine::{frame_error, Termination, VM};
use ipp_common::value::{compare, decode_escapes, equals};
use ipp_common::{ArgumentKind, Instruction, Opcode, Value};
use std::cmp::Ordering;
use std::io;
use tracing::{debug, trace};

/// Exclusive magnitude bound of floats that truncate into an `i64`.
const I64_FLOAT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl<'a> VM<'a> {
    /// Run until EXIT, running off the end, or an error.
    ///
    /// Output written before an error stays written; both streams are
    /// flushed either way.
    pub fn execute(&mut self) -> Result<Termination, RuntimeError> {
        let outcome = loop {
            match self.step() {
                Ok(None) => continue,
                Ok(Some(done)) => break Ok(done),
                Err(e) => break Err(e),
            }
        };
        let flushed = self.flush();
        let done = outcome?;
        flushed?;
        Ok(done)
    }

    /// Execute one instruction. Returns `Some` once the program has ended.
    pub fn step(&mut self) -> Result<Option<Termination>, RuntimeError> {
        let program = self.program;
        let Some(instr) = self.pointer.and_then(|order| program.get(order)) else {
            return Ok(Some(Termination::Completed));
        };

        trace!(order = instr.order, opcode = %instr.opcode, "step");
        self.jumped = false;
        self.stats.record(instr.opcode, instr.order);

        match instr.opcode {
            // Frames and variables
            Opcode::Move => {
                let value = self.determine_value(instr, 2)?;
                self.store(instr, value)?;
            }
            Opcode::CreateFrame => self.frames.create_temp(),
            Opcode::PushFrame => {
                self.frames
                    .push_temp()
                    .map_err(|e| frame_error(instr, e))?;
                debug!(depth = self.frames.locals().len(), "pushed frame");
            }
            Opcode::PopFrame => {
                self.frames
                    .pop_temp()
                    .map_err(|e| frame_error(instr, e))?;
                debug!(depth = self.frames.locals().len(), "popped frame");
            }
            Opcode::DefVar => {
                let var = self.var(instr, 1)?;
                self.frames
                    .declare(&var)
                    .map_err(|e| frame_error(instr, e))?;
            }

            // Calls and the data stack
            Opcode::Call => self.exec_call(instr)?,
            Opcode::Return => self.exec_return(instr)?,
            Opcode::PushS => {
                let value = self.determine_value(instr, 1)?;
                self.push(value);
            }
            Opcode::PopS => {
                let value = self.pop(instr.order)?;
                self.store(instr, value)?;
            }

            // Arithmetic
            Opcode::Add => self.exec_arith(instr, i64::wrapping_add)?,
            Opcode::Sub => self.exec_arith(instr, i64::wrapping_sub)?,
            Opcode::Mul => self.exec_arith(instr, i64::wrapping_mul)?,
            Opcode::IDiv => self.exec_idiv(instr)?,

            // Relational and logic
            Opcode::Lt => self.exec_relational(instr, Ordering::Less)?,
            Opcode::Gt => self.exec_relational(instr, Ordering::Greater)?,
            Opcode::Eq => {
                let equal = self.equal_operands(instr, 2)?;
                self.store(instr, Value::Bool(equal))?;
            }
            Opcode::And => self.exec_logic(instr, |a, b| a && b)?,
            Opcode::Or => self.exec_logic(instr, |a, b| a || b)?,
            Opcode::Not => match self.determine_value(instr, 2)? {
                Value::Bool(b) => self.store(instr, Value::Bool(!b))?,
                _ => return Err(type_error(instr)),
            },

            // Conversions
            Opcode::Int2Char => self.exec_int2char(instr)?,
            Opcode::Stri2Int => {
                let (s, index) = self.string_and_index(instr)?;
                let c = char_at(instr, &s, index)?;
                self.store(instr, Value::Int(i64::from(u32::from(c))))?;
            }
            Opcode::Int2Float => match self.determine_value(instr, 2)? {
                Value::Int(i) => self.store(instr, Value::Float(i as f64))?,
                _ => return Err(type_error(instr)),
            },
            Opcode::Float2Int => self.exec_float2int(instr)?,

            // I/O
            Opcode::Read => self.exec_read(instr)?,
            Opcode::Write => {
                let value = self.determine_value(instr, 1)?;
                emit(&mut *self.streams.output, &value).map_err(|e| output_error(instr, e))?;
            }

            // Strings
            Opcode::Concat => {
                let a = self.determine_value(instr, 2)?;
                let b = self.determine_value(instr, 3)?;
                match (a, b) {
                    (Value::Str(a), Value::Str(b)) => self.store(instr, Value::Str(a + &b))?,
                    _ => return Err(type_error(instr)),
                }
            }
            Opcode::StrLen => match self.determine_value(instr, 2)? {
                Value::Str(s) => self.store(instr, Value::Int(s.chars().count() as i64))?,
                _ => return Err(type_error(instr)),
            },
            Opcode::GetChar => {
                let (s, index) = self.string_and_index(instr)?;
                let c = char_at(instr, &s, index)?;
                self.store(instr, Value::Str(c.to_string()))?;
            }
            Opcode::SetChar => self.exec_setchar(instr)?,

            // Types
            Opcode::Type => self.exec_type(instr)?,

            // Control flow
            Opcode::Label => {}
            Opcode::Jump => {
                let target = self.label_target(instr, 1)?;
                self.jump_to(Some(target));
            }
            Opcode::JumpIfEq => self.exec_conditional_jump(instr, true)?,
            Opcode::JumpIfNeq => self.exec_conditional_jump(instr, false)?,
            Opcode::Exit => return self.exec_exit(instr).map(Some),

            // Debugging
            Opcode::DPrint => {
                let value = self.determine_value(instr, 1)?;
                emit(&mut *self.streams.diagnostic, &value)
                    .map_err(|e| output_error(instr, e))?;
            }
            Opcode::Break => {
                let dump = self.describe_state(instr.order);
                self.streams
                    .diagnostic
                    .write_string(&dump)
                    .map_err(|e| output_error(instr, e))?;
            }
        }

        self.stats
            .observe(self.frames.live_variable_count(), self.data_stack.len());
        if !self.jumped {
            self.pointer = program.next_order(instr.order);
        }
        Ok(None)
    }

    fn flush(&mut self) -> Result<(), RuntimeError> {
        let at = self.pointer.unwrap_or(0);
        let to_error = |e: io::Error| RuntimeError::Output {
            at,
            message: e.to_string(),
        };
        self.streams.output.flush().map_err(to_error)?;
        self.streams.diagnostic.flush().map_err(to_error)
    }

    // ---- Calls ----

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let target = self.label_target(instr, 1)?;
        let return_to = self.program.next_order(instr.order);
        self.call_stack.push(return_to);
        debug!(from = instr.order, to = target, depth = self.call_stack.len(), "call");
        self.jump_to(Some(target));
        Ok(())
    }

    fn exec_return(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let return_to = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::EmptyCallStack { at: instr.order })?;
        debug!(from = instr.order, to = ?return_to, depth = self.call_stack.len(), "return");
        self.jump_to(return_to);
        Ok(())
    }

    // ---- Arithmetic and logic ----

    fn int_operands(&self, instr: &Instruction) -> Result<(i64, i64), RuntimeError> {
        match (self.determine_value(instr, 2)?, self.determine_value(instr, 3)?) {
            (Value::Int(a), Value::Int(b)) => Ok((a, b)),
            _ => Err(type_error(instr)),
        }
    }

    fn exec_arith(
        &mut self,
        instr: &Instruction,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let (a, b) = self.int_operands(instr)?;
        self.store(instr, Value::Int(op(a, b)))
    }

    fn exec_idiv(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (a, b) = self.int_operands(instr)?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero { at: instr.order });
        }
        self.store(instr, Value::Int(a.wrapping_div(b)))
    }

    fn exec_relational(
        &mut self,
        instr: &Instruction,
        wanted: Ordering,
    ) -> Result<(), RuntimeError> {
        let a = self.determine_value(instr, 2)?;
        let b = self.determine_value(instr, 3)?;
        let ordering = compare(&a, &b).map_err(|_| type_error(instr))?;
        self.store(instr, Value::Bool(ordering == wanted))
    }

    /// EQ rule applied to the operands at `first` and `first + 1`.
    fn equal_operands(&self, instr: &Instruction, first: usize) -> Result<bool, RuntimeError> {
        let a = self.determine_value(instr, first)?;
        let b = self.determine_value(instr, first + 1)?;
        equals(&a, &b).map_err(|_| type_error(instr))
    }

    fn exec_logic(
        &mut self,
        instr: &Instruction,
        op: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        match (self.determine_value(instr, 2)?, self.determine_value(instr, 3)?) {
            (Value::Bool(a), Value::Bool(b)) => self.store(instr, Value::Bool(op(a, b))),
            _ => Err(type_error(instr)),
        }
    }

    // ---- Conversions ----

    fn exec_int2char(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Value::Int(code) = self.determine_value(instr, 2)? else {
            return Err(type_error(instr));
        };
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCodePoint {
                at: instr.order,
                value: code,
            })?;
        self.store(instr, Value::Str(c.to_string()))
    }

    fn exec_float2int(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Value::Float(f) = self.determine_value(instr, 2)? else {
            return Err(type_error(instr));
        };
        let truncated = f.trunc();
        if !(-I64_FLOAT_LIMIT..I64_FLOAT_LIMIT).contains(&truncated) {
            return Err(RuntimeError::FloatNotIntegral {
                at: instr.order,
                value: f.to_string(),
            });
        }
        self.store(instr, Value::Int(truncated as i64))
    }

    // ---- Strings ----

    fn string_and_index(&self, instr: &Instruction) -> Result<(String, i64), RuntimeError> {
        match (self.determine_value(instr, 2)?, self.determine_value(instr, 3)?) {
            (Value::Str(s), Value::Int(i)) => Ok((s, i)),
            _ => Err(type_error(instr)),
        }
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let target = self.var(instr, 1)?;
        let current = self
            .frames
            .read(&target)
            .map_err(|e| frame_error(instr, e))?
            .clone();
        let (Value::Str(s), Value::Int(index), Value::Str(replacement)) = (
            current,
            self.determine_value(instr, 2)?,
            self.determine_value(instr, 3)?,
        ) else {
            return Err(type_error(instr));
        };

        let position = char_index(instr, &s, index)?;
        let new_char = replacement
            .chars()
            .next()
            .ok_or(RuntimeError::EmptyReplacement { at: instr.order })?;
        let updated: String = s
            .chars()
            .enumerate()
            .map(|(i, c)| if i == position { new_char } else { c })
            .collect();
        self.store(instr, Value::Str(updated))
    }

    // ---- Types and I/O ----

    fn exec_type(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let arg = self.arg(instr, 2)?;
        let name = if arg.kind() == ArgumentKind::Variable {
            let var = self.var(instr, 2)?;
            self.frames
                .slot(&var)
                .map_err(|e| frame_error(instr, e))?
                .map_or("", |v| v.class().name())
        } else {
            self.determine_value(instr, 2)?.class().name()
        };
        self.store(instr, Value::Str(name.to_string()))
    }

    fn exec_read(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let type_name = self.name(instr, 2)?;
        let input = &mut *self.streams.input;
        let value = match type_name {
            "int" => input.read_int().map(Value::Int),
            "bool" => input.read_bool().map(Value::Bool),
            "string" => input.read_string().map(Value::Str),
            "float" => input.read_float().map(Value::Float),
            _ => {
                return Err(RuntimeError::MalformedArgument {
                    at: instr.order,
                    position: 2,
                })
            }
        };
        self.store(instr, value.unwrap_or(Value::Nil))
    }

    // ---- Control flow ----

    fn exec_conditional_jump(
        &mut self,
        instr: &Instruction,
        jump_if_equal: bool,
    ) -> Result<(), RuntimeError> {
        let target = self.label_target(instr, 1)?;
        if self.equal_operands(instr, 2)? == jump_if_equal {
            self.jump_to(Some(target));
        }
        Ok(())
    }

    fn exec_exit(&mut self, instr: &Instruction) -> Result<Termination, RuntimeError> {
        let Value::Int(code) = self.determine_value(instr, 1)? else {
            return Err(type_error(instr));
        };
        match u8::try_from(code) {
            Ok(status) if status <= 9 => {
                debug!(order = instr.order, status, "exit");
                Ok(Termination::Exit(status))
            }
            _ => Err(RuntimeError::InvalidExitCode {
                at: instr.order,
                code,
            }),
        }
    }

    /// State dump written by BREAK.
    fn describe_state(&self, order: u32) -> String {
        let mut lines = vec![
            format!(
                "BREAK at order {order}, {} instructions executed",
                self.stats.executed()
            ),
            format!("GF: {}", describe_frame(self.frames.global())),
        ];
        lines.push(match self.frames.temporary() {
            Some(frame) => format!("TF: {}", describe_frame(frame)),
            None => "TF: undefined".to_string(),
        });
        for (depth, frame) in self.frames.locals().iter().enumerate().rev() {
            lines.push(format!("LF[{depth}]: {}", describe_frame(frame)));
        }
        lines.push(format!(
            "call stack: {}, data stack: {}",
            self.call_stack.len(),
            self.data_stack.len()
        ));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Forward a value to a writer using the method for its class.
fn emit(writer: &mut dyn OutputWriter, value: &Value) -> io::Result<()> {
    match value {
        Value::Int(i) => writer.write_int(*i),
        Value::Float(f) => writer.write_float(*f),
        Value::Bool(b) => writer.write_bool(*b),
        Value::Str(s) => writer.write_string(&decode_escapes(s)),
        Value::Nil => writer.write_string(""),
    }
}

/// Bounds check shared by STRI2INT, GETCHAR and SETCHAR.
fn char_index(instr: &Instruction, s: &str, index: i64) -> Result<usize, RuntimeError> {
    let length = s.chars().count();
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .ok_or(RuntimeError::StringIndex {
            at: instr.order,
            index,
            length,
        })
}

fn char_at(instr: &Instruction, s: &str, index: i64) -> Result<char, RuntimeError> {
    let position = char_index(instr, s, index)?;
    s.chars().nth(position).ok_or(RuntimeError::StringIndex {
        at: instr.order,
        index,
        length: position,
    })
}

fn describe_frame(frame: &Frame) -> String {
    let mut names: Vec<&String> = frame.keys().collect();
    names.sort();
    let entries: Vec<String> = names
        .into_iter()
        .map(|name| match frame.get(name).and_then(Option::as_ref) {
            Some(value) => format!("{name}={}@{}", value.class(), value.to_output()),
            None => format!("{name}=<uninitialized>"),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn type_error(instr: &Instruction) -> RuntimeError {
    RuntimeError::OperandType {
        at: instr.order,
        opcode: instr.opcode,
    }
}

fn output_error(instr: &Instruction, e: io::Error) -> RuntimeError {
    RuntimeError::Output {
        at: instr.order,
        message: e.to_string(),
    }
}
