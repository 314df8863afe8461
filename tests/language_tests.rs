// End to end behaviour of the language, checked through the printed output of each statement.

use std::thread;
use treeforth::{
    ErrorKind, ForthMachine, Interpreter, InterpreterStack, MachineConfig, ScriptError,
};

/// Run the source on the machine and join the output of every statement.
fn output(machine: &mut ForthMachine, source: &str) -> String {
    machine.execute(source).unwrap().concat()
}

fn run(source: &str) -> String {
    output(&mut ForthMachine::new(), source)
}

fn run_error(machine: &mut ForthMachine, source: &str) -> ScriptError {
    match machine.execute(source) {
        Ok(outputs) => panic!("{:?} succeeded with output {:?}", source, outputs),
        Err(error) => error,
    }
}

fn stack(machine: &ForthMachine) -> Vec<i64> {
    machine.stack().iter().copied().collect()
}

/// Deep recursion needs more host stack than a test thread gets by default.
fn on_large_stack<F>(test: F)
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(test)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn subtraction_prints_the_difference() {
    assert_eq!(run("5 3 - ."), "2 ");
}

#[test]
fn each_statement_has_its_own_output() {
    let mut machine = ForthMachine::new();
    let outputs = machine.execute("1 . : X ; 2 .").unwrap();

    assert_eq!(outputs, vec!["1 ", "", "2 "]);
}

#[test]
fn do_loop_counts_up_to_the_limit() {
    assert_eq!(run("10 0 DO I . LOOP"), "0 1 2 3 4 5 6 7 8 9 ");
}

#[test]
fn do_loop_runs_at_least_once() {
    assert_eq!(run("0 0 DO I . LOOP"), "0 ");
}

#[test]
fn plus_loop_steps_by_the_popped_value() {
    assert_eq!(run("10 0 DO I . 3 +LOOP"), "0 3 6 9 ");
}

#[test]
fn plus_loop_counts_down_with_a_negative_step() {
    assert_eq!(run("0 10 DO I . -3 +LOOP"), "10 7 4 1 ");
}

#[test]
fn nested_loops_see_both_indices() {
    assert_eq!(run("2 0 DO 2 0 DO J . I . LOOP LOOP"), "0 0 0 1 1 0 1 1 ");
}

#[test]
fn leave_exits_only_the_innermost_loop() {
    let source = "3 0 DO 10 0 DO I 2 = IF LEAVE THEN J . I . LOOP LOOP";

    assert_eq!(run(source), "0 0 0 1 1 0 1 1 2 0 2 1 ");
}

#[test]
fn loop_index_does_not_leak_into_called_words() {
    assert_eq!(run(": SHOW I . ; 3 0 DO SHOW LOOP"), "I?I?I?");
}

#[test]
fn loops_inside_words_use_their_own_indices() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": ROW 3 0 DO I . LOOP ;");

    assert_eq!(output(&mut machine, "2 0 DO ROW LOOP"), "0 1 2 0 1 2 ");
}

#[test]
fn defined_word_squares() {
    assert_eq!(run(": SQ DUP * ; 5 SQ ."), "25 ");
}

#[test]
fn begin_until_terminates() {
    let mut machine = ForthMachine::new();

    assert_eq!(
        output(&mut machine, "1 BEGIN DUP . 1 + DUP 10 > UNTIL"),
        "1 2 3 4 5 6 7 8 9 10 "
    );
    assert_eq!(stack(&machine), vec![11]);
}

#[test]
fn begin_while_repeat_tests_before_the_body() {
    let mut machine = ForthMachine::new();

    assert_eq!(
        output(&mut machine, "0 BEGIN DUP 3 < WHILE DUP . 1 + REPEAT"),
        "0 1 2 "
    );
    assert_eq!(stack(&machine), vec![3]);
}

#[test]
fn begin_again_runs_until_leave() {
    assert_eq!(run("0 BEGIN 1 + DUP 5 = IF LEAVE THEN AGAIN ."), "5 ");
}

#[test]
fn if_else_chooses_a_branch() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": SIGN 0< IF .\" neg\" ELSE .\" pos\" THEN ;");

    assert_eq!(output(&mut machine, "-5 SIGN 5 SIGN"), " neg pos");
}

#[test]
fn if_without_else_does_nothing_when_false() {
    assert_eq!(run("0 IF 1 . THEN 2 ."), "2 ");
}

#[test]
fn nested_ifs_are_matched_up() {
    assert_eq!(run("1 0 IF 2 ELSE 1 IF 3 ELSE 4 THEN THEN ."), "3 ");
}

#[test]
fn recursion_works() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": FACT DUP 1 > IF DUP 1 - FACT * THEN ;");

    assert_eq!(output(&mut machine, "5 FACT ."), "120 ");
}

#[test]
fn deep_recursion_succeeds() {
    on_large_stack(|| {
        let mut machine = ForthMachine::new();

        output(&mut machine, ": COUNTDOWN DUP 0 > IF 1 - COUNTDOWN THEN ;");
        output(&mut machine, "900 COUNTDOWN");

        assert_eq!(stack(&machine), vec![0]);
    });
}

#[test]
fn runaway_recursion_is_stopped() {
    on_large_stack(|| {
        let mut machine = ForthMachine::new();
        let error = run_error(&mut machine, "1 2 : R R ; R");

        assert_eq!(error.kind(), ErrorKind::CallDepthExceeded);
        assert!(machine.stack().is_empty());

        assert_eq!(output(&mut machine, "5 ."), "5 ");
    });
}

#[test]
fn call_depth_counts_only_word_calls() {
    let mut machine = ForthMachine::with_config(MachineConfig {
        max_call_depth: 10,
        ..MachineConfig::default()
    });

    output(&mut machine, ": COUNTDOWN DUP 0 > IF 1 - COUNTDOWN THEN ;");

    assert_eq!(output(&mut machine, "9 COUNTDOWN ."), "0 ");

    let error = run_error(&mut machine, "10 COUNTDOWN");

    assert_eq!(error.kind(), ErrorKind::CallDepthExceeded);

    output(&mut machine, ": NESTED 2 0 DO 1 IF BEGIN 1 UNTIL 2 0 DO I DROP LOOP THEN LOOP ;");

    assert_eq!(output(&mut machine, "NESTED 7 ."), "7 ");
}

#[test]
fn redefinition_shadows_until_forgotten() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": X 1 ; : X 2 ;");

    assert_eq!(output(&mut machine, "X ."), "2 ");
    assert_eq!(output(&mut machine, "FORGET X X ."), "1 ");
}

#[test]
fn forget_removes_everything_defined_later() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": A 1 ; : B 2 ; : C 3 ;");
    output(&mut machine, "FORGET B");

    assert_eq!(output(&mut machine, "A ."), "1 ");
    assert_eq!(output(&mut machine, "B ."), "B?");
    assert_eq!(output(&mut machine, "C ."), "C?");
}

#[test]
fn forgotten_words_inside_surviving_bodies_are_unresolved() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": USER HELPER . ;");
    output(&mut machine, ": HELPER 7 ;");

    assert_eq!(output(&mut machine, "USER"), "7 ");

    output(&mut machine, "FORGET HELPER");

    assert_eq!(output(&mut machine, "USER"), "HELPER?");
    assert_eq!(output(&mut machine, ": HELPER 9 ; USER"), "9 ");
}

#[test]
fn underflow_leaves_an_empty_stack() {
    let mut machine = ForthMachine::new();
    let error = run_error(&mut machine, "DROP");

    assert_eq!(error.kind(), ErrorKind::StackUnderflow);
    assert!(machine.stack().is_empty());
}

#[test]
fn failures_clear_the_data_stack() {
    let mut machine = ForthMachine::new();

    output(&mut machine, "1 2 3");

    let error = run_error(&mut machine, "4 5 0 /");

    assert_eq!(error.kind(), ErrorKind::DivisionByZero);
    assert!(machine.stack().is_empty());
    assert_eq!(output(&mut machine, "5 ."), "5 ");
}

#[test]
fn lex_errors_clear_the_data_stack() {
    let mut machine = ForthMachine::new();

    output(&mut machine, "1 2");

    let error = run_error(&mut machine, "3 ( never closed");

    assert!(error.kind().is_lex_error());
    assert!(machine.stack().is_empty());
}

#[test]
fn unresolved_word_keeps_the_stack() {
    let mut machine = ForthMachine::new();

    assert_eq!(output(&mut machine, "1 2 NOPE 3"), "NOPE?");
    assert_eq!(stack(&machine), vec![1, 2]);
}

#[test]
fn abort_propagates_out_of_nested_words() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": INNER 1 ABORT ; : OUTER 5 6 INNER 7 ;");

    let error = run_error(&mut machine, "1 2 OUTER");

    assert_eq!(error.kind(), ErrorKind::UserAbort);
    assert!(machine.stack().is_empty());

    let call_stack = error.call_stack().clone().unwrap_or_default();
    let names: Vec<&str> = call_stack.iter().map(|item| item.word().as_str()).collect();

    assert_eq!(names, vec!["OUTER", "INNER", "ABORT"]);
}

#[test]
fn abort_uses_the_following_string_as_its_message() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": CHECK 10 > ABORT .\" too big\" ;");

    assert_eq!(output(&mut machine, "5 CHECK 1 ."), "1 ");

    let error = run_error(&mut machine, "50 CHECK");

    assert_eq!(error.kind(), ErrorKind::UserAbort);
    assert_eq!(error.error(), "too big");
}

#[test]
fn leave_outside_of_a_loop_is_fatal() {
    let mut machine = ForthMachine::new();
    let error = run_error(&mut machine, "1 2 LEAVE");

    assert!(error.is_loop_exit());
    assert!(machine.stack().is_empty());
}

#[test]
fn return_stack_can_be_used_within_a_word() {
    assert_eq!(run(": SWAPR >R >R R> R> ; 1 2 SWAPR . ."), "2 1 ");
}

#[test]
fn unbalanced_return_stack_is_cleared() {
    let mut machine = ForthMachine::new();
    let error = run_error(&mut machine, ": BAD 1 >R ; 5 BAD");

    assert_eq!(error.kind(), ErrorKind::UnbalancedReturnStack);
    assert!(machine.return_stack().is_empty());
    assert!(machine.stack().is_empty());
}

#[test]
fn clear_empties_both_stacks() {
    let mut machine = ForthMachine::new();

    output(&mut machine, "1 2 3 >R CLEAR");

    assert!(machine.stack().is_empty());
    assert!(machine.return_stack().is_empty());
}

#[test]
fn printing_uses_the_current_radix() {
    let mut machine = ForthMachine::new();

    assert_eq!(output(&mut machine, "255 HEX ."), "ff ");
    assert_eq!(output(&mut machine, "DECIMAL 255 ."), "255 ");
    assert_eq!(output(&mut machine, "-255 HEX . DECIMAL"), "-ff ");
    assert_eq!(output(&mut machine, "5 OCTAL . BINARY 5 . DECIMAL"), "5 101 ");
}

#[test]
fn words_are_read_in_the_current_radix() {
    let mut machine = ForthMachine::new();

    assert_eq!(output(&mut machine, "HEX ff 1 + ."), "100 ");
    assert_eq!(machine.radix(), 16);
}

#[test]
fn stack_dump() {
    let mut machine = ForthMachine::new();

    assert_eq!(output(&mut machine, ".S"), "<0> EMPTY");
    assert_eq!(output(&mut machine, "1 2 3 .S"), "<3> 1 2 3 ");
    assert_eq!(output(&mut machine, "CLEAR 255 HEX .S DECIMAL"), "<1> ff ");
}

#[test]
fn variables_hold_values() {
    let mut machine = ForthMachine::new();

    output(&mut machine, "VARIABLE COUNT 5 COUNT !");

    assert_eq!(output(&mut machine, "COUNT ?"), "5 ");
    assert_eq!(output(&mut machine, "COUNT !+ COUNT @ ."), "6 ");
}

#[test]
fn variables_shadow_words() {
    let mut machine = ForthMachine::new();

    output(&mut machine, ": SPOT 42 ; VARIABLE SPOT");

    assert_eq!(output(&mut machine, "SPOT ."), "1000 ");
}

#[test]
fn character_output() {
    assert_eq!(run("72 EMIT 105 EMIT"), "Hi");
    assert_eq!(run("1 . CR 2 ."), "1 \n2 ");
    assert_eq!(run("3 SPACES"), "   ");
    assert_eq!(run("-2 SPACES"), "");
}

#[test]
fn formatted_number_output() {
    assert_eq!(run("-1 U."), "18446744073709551615 ");
    assert_eq!(run("42 5 .RIGHT"), "   42");
    assert_eq!(run("HEX 255 6 .RIGHT"), "    ff");
    assert_eq!(run("42 -3 .RIGHT"), "42");
}

#[test]
fn oversized_fields_are_rejected() {
    let mut machine = ForthMachine::new();

    output(&mut machine, "1 2");

    let error = run_error(&mut machine, "9223372036854775807 SPACES");

    assert_eq!(error.kind(), ErrorKind::OutOfRange);
    assert!(machine.stack().is_empty());

    let error = run_error(&mut machine, "1 9223372036854775807 .RIGHT");

    assert_eq!(error.kind(), ErrorKind::OutOfRange);
    assert_eq!(run("4096 SPACES").len(), 4096);
}

#[test]
fn return_stack_dump() {
    let mut machine = ForthMachine::new();

    assert_eq!(output(&mut machine, ".R"), "<0> EMPTY");
    assert_eq!(output(&mut machine, "1 >R 2 >R .R"), "<2> 1 2 ");
    assert_eq!(output(&mut machine, "CLEAR 255 >R HEX .R DECIMAL"), "<1> ff ");
    assert!(machine.stack().is_empty());
}

#[test]
fn see_shows_definitions() {
    assert_eq!(run(": SQ DUP * ; SEE SQ"), ": SQ   DUP * ;\n");
    assert_eq!(run("SEE DUP"), ": DUP   <builtin> ;\n");
}

#[test]
fn words_lists_the_dictionary() {
    let listing = run(": SQ DUP * ; WORDS");

    assert!(listing.contains("SQ"));
    assert!(listing.contains("DUP"));
    assert!(listing.contains("User defined word."));
}

#[test]
fn comments_are_ignored() {
    assert_eq!(run("1 ( this is ignored ) 2 + ."), "3 ");
}

#[test]
fn strings_are_printed() {
    assert_eq!(run(".\" Hello world!\""), " Hello world!");
}
