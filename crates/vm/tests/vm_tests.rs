//! Integration tests for the IPPcode24 VM.
//!
//! Programs are written as `(opcode, args)` rows with arguments in
//! `type@value` form (`GF@x` for variables) and loaded through the loader.

use ipp_common::{RawArgument, RawInstruction, RawProgram, ReturnCode};
use ipp_loader::load;
use ipp_vm::io::{LineReader, StreamWriter};
use ipp_vm::{RuntimeError, Stats, Streams, Termination, VM};
use proptest::prelude::*;
use std::io::Cursor;

// ============================================================
// Helper functions
// ============================================================

type Row<'a> = (&'a str, &'a [&'a str]);

/// Split an argument into (data type, value).
fn split_arg(text: &str) -> (&str, &str) {
    if ["GF@", "LF@", "TF@"].iter().any(|p| text.starts_with(p)) {
        ("var", text)
    } else {
        text.split_once('@').unwrap_or((text, ""))
    }
}

fn rec(order: u32, opcode: &str, args: &[&str]) -> RawInstruction {
    RawInstruction::new(
        order,
        opcode,
        args.iter()
            .enumerate()
            .map(|(i, a)| {
                let (dt, v) = split_arg(a);
                RawArgument::new(i + 1, dt, v)
            })
            .collect(),
    )
}

struct Outcome {
    result: Result<Termination, RuntimeError>,
    stdout: String,
    stderr: String,
    stats: Stats,
}

impl Outcome {
    fn code(&self) -> ReturnCode {
        self.result.as_ref().unwrap_err().return_code()
    }
}

fn run_raw(raw: RawProgram, input: &str) -> Outcome {
    let program = load(&raw).expect("program loads");
    let mut reader = LineReader::new(Cursor::new(input.to_string()));
    let mut output = StreamWriter::new(Vec::new());
    let mut diagnostic = StreamWriter::new(Vec::new());
    let (result, stats) = {
        let mut vm = VM::new(
            &program,
            Streams {
                input: &mut reader,
                output: &mut output,
                diagnostic: &mut diagnostic,
            },
        );
        let result = vm.execute();
        (result, vm.stats().clone())
    };
    Outcome {
        result,
        stdout: String::from_utf8(output.into_inner()).unwrap(),
        stderr: String::from_utf8(diagnostic.into_inner()).unwrap(),
        stats,
    }
}

/// Run rows numbered 1..=n with the given standard input.
fn run_input(rows: &[Row], input: &str) -> Outcome {
    let records = rows
        .iter()
        .enumerate()
        .map(|(i, (op, args))| rec(i as u32 + 1, op, args))
        .collect();
    run_raw(RawProgram::new(records), input)
}

fn run(rows: &[Row]) -> Outcome {
    run_input(rows, "")
}

/// Stdout of a program that must complete normally.
fn output_of(rows: &[Row]) -> String {
    let outcome = run(rows);
    assert_eq!(outcome.result, Ok(Termination::Completed), "stdout: {}", outcome.stdout);
    outcome.stdout
}

/// Evaluate a three-address operator into GF@r and write it.
fn eval3(opcode: &str, a: &str, b: &str) -> Outcome {
    run(&[
        ("DEFVAR", &["GF@r"]),
        (opcode, &["GF@r", a, b]),
        ("WRITE", &["GF@r"]),
    ])
}

// ============================================================
// Sequencing
// ============================================================

#[test]
fn empty_program_completes() {
    let outcome = run(&[]);
    assert_eq!(outcome.result, Ok(Termination::Completed));
    assert!(outcome.stdout.is_empty());
}

#[test]
fn executes_by_ascending_order_with_gaps() {
    let raw = RawProgram::new(vec![
        rec(30, "WRITE", &["string@c"]),
        rec(5, "WRITE", &["string@a"]),
        rec(12, "WRITE", &["string@b"]),
    ]);
    let outcome = run_raw(raw, "");
    assert_eq!(outcome.stdout, "abc");
    assert_eq!(outcome.result, Ok(Termination::Completed));
}

// ============================================================
// Arithmetic
// ============================================================

#[test]
fn add_sub_mul() {
    assert_eq!(eval3("ADD", "int@2", "int@3").stdout, "5");
    assert_eq!(eval3("SUB", "int@2", "int@3").stdout, "-1");
    assert_eq!(eval3("MUL", "int@-4", "int@3").stdout, "-12");
}

#[test]
fn idiv_truncates_toward_zero() {
    assert_eq!(eval3("IDIV", "int@7", "int@2").stdout, "3");
    assert_eq!(eval3("IDIV", "int@-7", "int@2").stdout, "-3");
}

#[test]
fn idiv_by_zero_is_operand_value_error() {
    let outcome = eval3("IDIV", "int@7", "int@0");
    assert_eq!(
        outcome.result,
        Err(RuntimeError::DivisionByZero { at: 2 })
    );
    assert_eq!(outcome.code(), ReturnCode::OperandValue);
}

#[test]
fn arithmetic_rejects_non_integers() {
    assert_eq!(eval3("ADD", "int@1", "string@1").code(), ReturnCode::OperandType);
    assert_eq!(eval3("MUL", "float@0x1p+0", "int@1").code(), ReturnCode::OperandType);
    assert_eq!(eval3("IDIV", "nil@nil", "int@0").code(), ReturnCode::OperandType);
}

// ============================================================
// Relational and logic
// ============================================================

#[test]
fn eq_with_nil() {
    assert_eq!(eval3("EQ", "nil@nil", "nil@nil").stdout, "true");
    assert_eq!(eval3("EQ", "nil@nil", "int@5").stdout, "false");
    assert_eq!(eval3("EQ", "string@x", "nil@nil").stdout, "false");
}

#[test]
fn eq_requires_same_class() {
    assert_eq!(eval3("EQ", "int@1", "int@1").stdout, "true");
    assert_eq!(eval3("EQ", "bool@true", "string@true").code(), ReturnCode::OperandType);
}

#[test]
fn lt_gt() {
    assert_eq!(eval3("LT", "int@1", "int@2").stdout, "true");
    assert_eq!(eval3("GT", "string@abc", "string@abd").stdout, "false");
    assert_eq!(eval3("LT", "bool@false", "bool@true").stdout, "true");
    assert_eq!(eval3("GT", "int@2", "int@2").stdout, "false");
}

#[test]
fn lt_with_nil_is_type_error() {
    assert_eq!(eval3("LT", "nil@nil", "int@5").code(), ReturnCode::OperandType);
    assert_eq!(eval3("GT", "nil@nil", "nil@nil").code(), ReturnCode::OperandType);
}

#[test]
fn logic_operators() {
    assert_eq!(eval3("AND", "bool@true", "bool@false").stdout, "false");
    assert_eq!(eval3("OR", "bool@true", "bool@false").stdout, "true");
    assert_eq!(
        output_of(&[
            ("DEFVAR", &["GF@r"]),
            ("NOT", &["GF@r", "bool@false"]),
            ("WRITE", &["GF@r"]),
        ]),
        "true"
    );
    assert_eq!(eval3("AND", "bool@true", "int@1").code(), ReturnCode::OperandType);
}

// ============================================================
// Frames and variables
// ============================================================

#[test]
fn uninitialized_read_is_variable_access_error() {
    let outcome = run(&[
        ("DEFVAR", &["GF@x"]),
        ("DEFVAR", &["GF@y"]),
        ("MOVE", &["GF@y", "GF@x"]),
    ]);
    assert_eq!(outcome.code(), ReturnCode::VariableAccess);
}

#[test]
fn undeclared_write_is_variable_access_error() {
    let outcome = run(&[("MOVE", &["GF@x", "int@1"])]);
    assert_eq!(outcome.code(), ReturnCode::VariableAccess);
}

#[test]
fn redeclaration_is_semantic_error() {
    let outcome = run(&[("DEFVAR", &["GF@x"]), ("DEFVAR", &["GF@x"])]);
    assert_eq!(outcome.code(), ReturnCode::Semantic);
}

#[test]
fn missing_frames_are_frame_access_errors() {
    assert_eq!(run(&[("DEFVAR", &["TF@x"])]).code(), ReturnCode::FrameAccess);
    assert_eq!(run(&[("DEFVAR", &["LF@x"])]).code(), ReturnCode::FrameAccess);
    assert_eq!(run(&[("PUSHFRAME", &[])]).code(), ReturnCode::FrameAccess);
    assert_eq!(run(&[("POPFRAME", &[])]).code(), ReturnCode::FrameAccess);
}

#[test]
fn pushframe_popframe_restores_temporary_frame() {
    let out = output_of(&[
        ("CREATEFRAME", &[]),
        ("DEFVAR", &["TF@a"]),
        ("DEFVAR", &["TF@b"]),
        ("MOVE", &["TF@a", "int@7"]),
        ("PUSHFRAME", &[]),
        ("WRITE", &["LF@a"]),
        ("POPFRAME", &[]),
        ("WRITE", &["TF@a"]),
        ("DEFVAR", &["GF@t"]),
        ("TYPE", &["GF@t", "TF@b"]),
        ("WRITE", &["GF@t"]),
    ]);
    assert_eq!(out, "77");
}

#[test]
fn empty_frame_survives_push_pop() {
    let outcome = run(&[
        ("CREATEFRAME", &[]),
        ("PUSHFRAME", &[]),
        ("POPFRAME", &[]),
        ("DEFVAR", &["TF@fresh"]),
    ]);
    assert_eq!(outcome.result, Ok(Termination::Completed));
}

#[test]
fn createframe_discards_previous_temporary() {
    let outcome = run(&[
        ("CREATEFRAME", &[]),
        ("DEFVAR", &["TF@a"]),
        ("CREATEFRAME", &[]),
        ("MOVE", &["TF@a", "int@1"]),
    ]);
    assert_eq!(outcome.code(), ReturnCode::VariableAccess);
}

// ============================================================
// TYPE
// ============================================================

#[test]
fn type_of_uninitialized_is_empty() {
    let out = output_of(&[
        ("DEFVAR", &["GF@x"]),
        ("DEFVAR", &["GF@t"]),
        ("TYPE", &["GF@t", "GF@x"]),
        ("WRITE", &["string@["]),
        ("WRITE", &["GF@t"]),
        ("WRITE", &["string@]"]),
    ]);
    assert_eq!(out, "[]");
}

#[test]
fn type_names() {
    for (literal, name) in [
        ("int@1", "int"),
        ("float@0x1p+0", "float"),
        ("bool@false", "bool"),
        ("string@", "string"),
        ("nil@nil", "nil"),
    ] {
        let out = output_of(&[
            ("DEFVAR", &["GF@t"]),
            ("TYPE", &["GF@t", literal]),
            ("WRITE", &["GF@t"]),
        ]);
        assert_eq!(out, name);
    }
}

#[test]
fn type_of_undeclared_is_error() {
    let outcome = run(&[("DEFVAR", &["GF@t"]), ("TYPE", &["GF@t", "GF@missing"])]);
    assert_eq!(outcome.code(), ReturnCode::VariableAccess);
}

// ============================================================
// Calls and stacks
// ============================================================

#[test]
fn call_returns_to_next_instruction() {
    let out = output_of(&[
        ("WRITE", &["string@a"]),
        ("CALL", &["label@f"]),
        ("WRITE", &["string@c"]),
        ("JUMP", &["label@end"]),
        ("LABEL", &["label@f"]),
        ("WRITE", &["string@b"]),
        ("RETURN", &[]),
        ("LABEL", &["label@end"]),
    ]);
    assert_eq!(out, "abc");
}

#[test]
fn nested_calls_unwind_in_order() {
    let out = output_of(&[
        ("CALL", &["label@outer"]),
        ("WRITE", &["string@3"]),
        ("JUMP", &["label@end"]),
        ("LABEL", &["label@outer"]),
        ("CALL", &["label@inner"]),
        ("WRITE", &["string@2"]),
        ("RETURN", &[]),
        ("LABEL", &["label@inner"]),
        ("WRITE", &["string@1"]),
        ("RETURN", &[]),
        ("LABEL", &["label@end"]),
    ]);
    assert_eq!(out, "123");
}

#[test]
fn return_after_final_call_terminates() {
    let outcome = run(&[
        ("JUMP", &["label@main"]),
        ("LABEL", &["label@f"]),
        ("WRITE", &["string@in"]),
        ("RETURN", &[]),
        ("LABEL", &["label@main"]),
        ("CALL", &["label@f"]),
    ]);
    assert_eq!(outcome.result, Ok(Termination::Completed));
    assert_eq!(outcome.stdout, "in");
}

#[test]
fn return_without_call_is_missing_value() {
    let outcome = run(&[("RETURN", &[])]);
    assert_eq!(outcome.result, Err(RuntimeError::EmptyCallStack { at: 1 }));
    assert_eq!(outcome.code(), ReturnCode::MissingValue);
}

#[test]
fn undefined_labels_are_semantic_errors() {
    assert_eq!(run(&[("CALL", &["label@nowhere"])]).code(), ReturnCode::Semantic);
    assert_eq!(run(&[("JUMP", &["label@nowhere"])]).code(), ReturnCode::Semantic);
    // The label is checked before the operands are compared.
    let outcome = run(&[("JUMPIFEQ", &["label@nowhere", "int@1", "string@x"])]);
    assert_eq!(outcome.code(), ReturnCode::Semantic);
}

#[test]
fn data_stack_is_lifo() {
    let out = output_of(&[
        ("DEFVAR", &["GF@x"]),
        ("PUSHS", &["int@1"]),
        ("PUSHS", &["string@two"]),
        ("POPS", &["GF@x"]),
        ("WRITE", &["GF@x"]),
        ("POPS", &["GF@x"]),
        ("WRITE", &["GF@x"]),
    ]);
    assert_eq!(out, "two1");
}

#[test]
fn pops_on_empty_stack_fails() {
    let outcome = run(&[("DEFVAR", &["GF@x"]), ("POPS", &["GF@x"])]);
    assert_eq!(outcome.code(), ReturnCode::MissingValue);
}

// ============================================================
// Control flow
// ============================================================

#[test]
fn conditional_loop_counts() {
    let out = output_of(&[
        ("DEFVAR", &["GF@i"]),
        ("MOVE", &["GF@i", "int@0"]),
        ("LABEL", &["label@loop"]),
        ("JUMPIFEQ", &["label@done", "GF@i", "int@3"]),
        ("WRITE", &["GF@i"]),
        ("ADD", &["GF@i", "GF@i", "int@1"]),
        ("JUMP", &["label@loop"]),
        ("LABEL", &["label@done"]),
    ]);
    assert_eq!(out, "012");
}

#[test]
fn jumpifneq_with_nil() {
    let out = output_of(&[
        ("JUMPIFNEQ", &["label@skip", "nil@nil", "int@0"]),
        ("WRITE", &["string@not-skipped"]),
        ("LABEL", &["label@skip"]),
        ("WRITE", &["string@end"]),
    ]);
    assert_eq!(out, "end");
}

#[test]
fn jumpifeq_type_mismatch_is_error() {
    let outcome = run(&[
        ("LABEL", &["label@l"]),
        ("JUMPIFEQ", &["label@l", "int@1", "bool@true"]),
    ]);
    assert_eq!(outcome.code(), ReturnCode::OperandType);
}

#[test]
fn exit_stops_immediately() {
    let outcome = run(&[
        ("WRITE", &["string@before"]),
        ("EXIT", &["int@3"]),
        ("WRITE", &["string@after"]),
    ]);
    assert_eq!(outcome.result, Ok(Termination::Exit(3)));
    assert_eq!(outcome.result.unwrap().code(), 3);
    assert_eq!(outcome.stdout, "before");
}

#[test]
fn exit_validates_its_operand() {
    assert_eq!(run(&[("EXIT", &["int@10"])]).code(), ReturnCode::OperandValue);
    assert_eq!(run(&[("EXIT", &["int@-1"])]).code(), ReturnCode::OperandValue);
    assert_eq!(run(&[("EXIT", &["string@1"])]).code(), ReturnCode::OperandType);
}

#[test]
fn output_before_error_is_kept() {
    let outcome = run(&[
        ("WRITE", &["string@partial"]),
        ("IDIV", &["GF@x", "int@1", "int@0"]),
    ]);
    assert_eq!(outcome.stdout, "partial");
    assert!(outcome.result.is_err());
}

// ============================================================
// Strings
// ============================================================

#[test]
fn string_operators() {
    assert_eq!(eval3("CONCAT", "string@foo", "string@bar").stdout, "foobar");
    assert_eq!(eval3("GETCHAR", "string@héllo", "int@1").stdout, "é");
    assert_eq!(eval3("STRI2INT", "string@A", "int@0").stdout, "65");
    let out = output_of(&[
        ("DEFVAR", &["GF@n"]),
        ("STRLEN", &["GF@n", "string@héllo"]),
        ("WRITE", &["GF@n"]),
    ]);
    assert_eq!(out, "5");
}

#[test]
fn setchar_replaces_one_character() {
    let out = output_of(&[
        ("DEFVAR", &["GF@s"]),
        ("MOVE", &["GF@s", "string@cat"]),
        ("SETCHAR", &["GF@s", "int@0", "string@bxx"]),
        ("WRITE", &["GF@s"]),
    ]);
    assert_eq!(out, "bat");
}

#[test]
fn index_equal_to_length_is_string_error() {
    assert_eq!(eval3("GETCHAR", "string@abc", "int@3").code(), ReturnCode::StringOperation);
    assert_eq!(eval3("STRI2INT", "string@abc", "int@3").code(), ReturnCode::StringOperation);
    assert_eq!(eval3("GETCHAR", "string@abc", "int@-1").code(), ReturnCode::StringOperation);
    let outcome = run(&[
        ("DEFVAR", &["GF@s"]),
        ("MOVE", &["GF@s", "string@abc"]),
        ("SETCHAR", &["GF@s", "int@3", "string@x"]),
    ]);
    assert_eq!(outcome.code(), ReturnCode::StringOperation);
}

#[test]
fn setchar_empty_replacement_fails() {
    let outcome = run(&[
        ("DEFVAR", &["GF@s"]),
        ("MOVE", &["GF@s", "string@abc"]),
        ("SETCHAR", &["GF@s", "int@0", "string@"]),
    ]);
    assert_eq!(outcome.result, Err(RuntimeError::EmptyReplacement { at: 3 }));
}

#[test]
fn string_operators_check_types() {
    assert_eq!(eval3("CONCAT", "string@a", "int@1").code(), ReturnCode::OperandType);
    assert_eq!(eval3("GETCHAR", "int@1", "int@0").code(), ReturnCode::OperandType);
    assert_eq!(eval3("STRI2INT", "string@a", "string@0").code(), ReturnCode::OperandType);
}

// ============================================================
// Conversions
// ============================================================

#[test]
fn int2char() {
    let convert = |code: &str| {
        run(&[
            ("DEFVAR", &["GF@c"]),
            ("INT2CHAR", &["GF@c", code]),
            ("WRITE", &["GF@c"]),
        ])
    };
    assert_eq!(convert("int@65").stdout, "A");
    assert_eq!(convert("int@-1").code(), ReturnCode::StringOperation);
    assert_eq!(convert("int@1114112").code(), ReturnCode::StringOperation);
    assert_eq!(convert("int@55296").code(), ReturnCode::StringOperation);
    assert_eq!(convert("string@A").code(), ReturnCode::OperandType);
}

#[test]
fn float_conversions() {
    let out = output_of(&[
        ("DEFVAR", &["GF@f"]),
        ("INT2FLOAT", &["GF@f", "int@3"]),
        ("WRITE", &["GF@f"]),
        ("DEFVAR", &["GF@i"]),
        ("FLOAT2INT", &["GF@i", "float@-0x1.8p+1"]),
        ("WRITE", &["GF@i"]),
    ]);
    assert_eq!(out, "0x1.8p+1-3");
}

#[test]
fn float2int_out_of_range() {
    let outcome = run(&[
        ("DEFVAR", &["GF@i"]),
        ("FLOAT2INT", &["GF@i", "float@0x1p+63"]),
    ]);
    assert_eq!(outcome.code(), ReturnCode::OperandValue);
}

// ============================================================
// I/O
// ============================================================

#[test]
fn write_formats_by_class() {
    let out = output_of(&[
        ("WRITE", &["bool@true"]),
        ("WRITE", &["nil@nil"]),
        ("WRITE", &["string@a\\032b\\010"]),
        ("WRITE", &["float@0x1.8p+1"]),
        ("WRITE", &["int@-5"]),
    ]);
    assert_eq!(out, "truea b\n0x1.8p+1-5");
}

#[test]
fn read_each_type() {
    let outcome = run_input(
        &[
            ("DEFVAR", &["GF@x"]),
            ("READ", &["GF@x", "type@int"]),
            ("WRITE", &["GF@x"]),
            ("READ", &["GF@x", "type@bool"]),
            ("WRITE", &["GF@x"]),
            ("READ", &["GF@x", "type@string"]),
            ("WRITE", &["GF@x"]),
            ("READ", &["GF@x", "type@float"]),
            ("WRITE", &["GF@x"]),
        ],
        "12\nTRUE\nsome text\n0x1p-1\n",
    );
    assert_eq!(outcome.stdout, "12truesome text0x1p-1");
}

#[test]
fn read_failure_stores_nil() {
    let outcome = run_input(
        &[
            ("DEFVAR", &["GF@x"]),
            ("DEFVAR", &["GF@t"]),
            ("READ", &["GF@x", "type@int"]),
            ("TYPE", &["GF@t", "GF@x"]),
            ("WRITE", &["GF@t"]),
            ("READ", &["GF@x", "type@string"]),
            ("TYPE", &["GF@t", "GF@x"]),
            ("WRITE", &["GF@t"]),
        ],
        "not a number\n",
    );
    assert_eq!(outcome.stdout, "nilnil");
}

#[test]
fn dprint_and_break_go_to_diagnostic_stream() {
    let outcome = run(&[
        ("DEFVAR", &["GF@x"]),
        ("MOVE", &["GF@x", "int@4"]),
        ("DPRINT", &["GF@x"]),
        ("BREAK", &[]),
    ]);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.starts_with('4'));
    assert!(outcome.stderr.contains("GF: {x=int@4}"));
    assert!(outcome.stderr.contains("TF: undefined"));
}

#[test]
fn break_dumps_every_frame_and_stack_depth() {
    let outcome = run(&[
        ("DEFVAR", &["GF@x"]),
        ("MOVE", &["GF@x", "int@4"]),
        ("CREATEFRAME", &[]),
        ("DEFVAR", &["TF@a"]),
        ("PUSHFRAME", &[]),
        ("CREATEFRAME", &[]),
        ("DEFVAR", &["TF@b"]),
        ("PUSHS", &["int@1"]),
        ("BREAK", &[]),
    ]);
    assert_eq!(outcome.result, Ok(Termination::Completed));
    assert_eq!(
        outcome.stderr,
        "BREAK at order 9, 8 instructions executed\n\
         GF: {x=int@4}\n\
         TF: {b=<uninitialized>}\n\
         LF[0]: {a=<uninitialized>}\n\
         call stack: 0, data stack: 1\n"
    );
}

// ============================================================
// Statistics
// ============================================================

#[test]
fn stats_track_execution() {
    let outcome = run(&[
        ("DEFVAR", &["GF@i"]),
        ("MOVE", &["GF@i", "int@0"]),
        ("LABEL", &["label@loop"]),
        ("ADD", &["GF@i", "GF@i", "int@1"]),
        ("PUSHS", &["GF@i"]),
        ("JUMPIFNEQ", &["label@loop", "GF@i", "int@3"]),
        ("CREATEFRAME", &[]),
        ("DEFVAR", &["TF@a"]),
        ("DPRINT", &["GF@i"]),
    ]);
    assert_eq!(outcome.result, Ok(Termination::Completed));
    let stats = &outcome.stats;
    // DEFVAR, MOVE, 3 x (ADD, PUSHS, JUMPIFNEQ), CREATEFRAME, DEFVAR
    assert_eq!(stats.executed(), 13);
    assert_eq!(stats.hottest_order(), Some(4));
    assert_eq!(stats.max_variables(), 2);
    assert_eq!(stats.max_data_stack(), 3);
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #[test]
    fn arithmetic_matches_wrapping_ops(a in any::<i64>(), b in any::<i64>()) {
        let a_lit = format!("int@{a}");
        let b_lit = format!("int@{b}");
        prop_assert_eq!(eval3("ADD", &a_lit, &b_lit).stdout, a.wrapping_add(b).to_string());
        prop_assert_eq!(eval3("SUB", &a_lit, &b_lit).stdout, a.wrapping_sub(b).to_string());
        prop_assert_eq!(eval3("MUL", &a_lit, &b_lit).stdout, a.wrapping_mul(b).to_string());
        if b != 0 {
            prop_assert_eq!(eval3("IDIV", &a_lit, &b_lit).stdout, a.wrapping_div(b).to_string());
        }
    }

    #[test]
    fn straight_line_runs_in_order(
        orders in prop::collection::btree_set(1u32..10_000, 1..20)
            .prop_map(|s| s.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let expected: String = {
            let mut sorted = orders.clone();
            sorted.sort_unstable();
            sorted.iter().map(|o| format!("{o};")).collect()
        };
        let records = orders
            .iter()
            .map(|&o| rec(o, "WRITE", &[format!("string@{o};").as_str()]))
            .collect();
        let outcome = run_raw(RawProgram::new(records), "");
        prop_assert_eq!(outcome.stdout, expected);
    }

    #[test]
    fn nested_calls_leave_call_stack_empty(depth in 1usize..12) {
        let mut records = vec![rec(1, "CALL", &["label@f0"]), rec(2, "WRITE", &["string@done"]),
                               rec(3, "JUMP", &["label@end"])];
        let mut order = 4;
        for level in 0..depth {
            records.push(rec(order, "LABEL", &[format!("label@f{level}").as_str()]));
            order += 1;
            if level + 1 < depth {
                records.push(rec(order, "CALL", &[format!("label@f{}", level + 1).as_str()]));
                order += 1;
            }
            records.push(rec(order, "RETURN", &[]));
            order += 1;
        }
        records.push(rec(order, "LABEL", &["label@end"]));
        let outcome = run_raw(RawProgram::new(records), "");
        prop_assert_eq!(outcome.result, Ok(Termination::Completed));
        prop_assert_eq!(outcome.stdout, "done");
    }
}
