// Table driven stack effect tests.  Each case starts a fresh machine, seeds the data stack, runs
// the source and compares the resulting stack bottom to top.

use test_case::test_case;
use treeforth::{CodeManagement, ErrorKind, ForthMachine, InterpreterStack, Result};

fn eval_and_stack(source: &str, init_stack: &[i64]) -> Result<Vec<i64>> {
    let mut machine = ForthMachine::new();

    for &value in init_stack {
        machine.push(value);
    }

    machine.process_source("<test>", source)?;

    Ok(machine.stack().iter().copied().collect())
}

fn eval_error(source: &str) -> ErrorKind {
    match eval_and_stack(source, &[]) {
        Ok(stack) => panic!("{:?} succeeded with stack {:?}", source, stack),
        Err(error) => error.kind(),
    }
}

#[test_case("0", &[], &[0]; "zero")]
#[test_case("42", &[], &[42]; "number")]
#[test_case("-42", &[], &[-42]; "negative number")]
#[test_case("TRUE", &[], &[-1]; "true word")]
#[test_case("FALSE", &[], &[0]; "false word")]
#[test_case("+", &[2, 2], &[4]; "simple add")]
#[test_case("-", &[5, 2], &[3]; "simple sub")]
#[test_case("*", &[3, 4], &[12]; "simple mul")]
#[test_case("/", &[12, 3], &[4]; "simple div")]
#[test_case("/", &[-7, 2], &[-3]; "div truncates toward zero")]
#[test_case("MOD", &[13, 5], &[3]; "simple mod")]
#[test_case("MOD", &[-7, 2], &[-1]; "mod takes the sign of the dividend")]
#[test_case("/MOD", &[13, 5], &[3, 2]; "simple div mod")]
#[test_case("+", &[i64::MAX, 1], &[i64::MIN]; "add wraps")]
#[test_case("2*", &[7], &[14]; "times two")]
#[test_case("2/", &[8], &[4]; "divide by two")]
#[test_case("1+", &[41], &[42]; "add one")]
#[test_case("1-", &[43], &[42]; "sub one")]
#[test_case("2+", &[1], &[3]; "add two")]
#[test_case("2-", &[5], &[3]; "sub two")]
#[test_case("ABS", &[-42], &[42]; "abs of negative number")]
#[test_case("ABS", &[9], &[9]; "abs of positive number")]
#[test_case("NEGATE", &[9], &[-9]; "negate positive number")]
#[test_case("NEGATE", &[-9], &[9]; "negate negative number")]
#[test_case("MIN", &[3, -4], &[-4]; "min")]
#[test_case("MAX", &[3, -4], &[3]; "max")]
fn arithmetic(source: &str, init_stack: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(source, init_stack).unwrap(), expected);
}

#[test_case("=", &[1, 1], &[-1]; "equal")]
#[test_case("=", &[1, 2], &[0]; "not equal")]
#[test_case("<>", &[1, 1], &[0]; "different for equal")]
#[test_case("<>", &[1, 2], &[-1]; "different")]
#[test_case("<", &[1, 2], &[-1]; "less is true")]
#[test_case("<", &[2, 1], &[0]; "less is false")]
#[test_case("<", &[1, 1], &[0]; "less for equal")]
#[test_case(">", &[2, 1], &[-1]; "greater is true")]
#[test_case(">", &[1, 2], &[0]; "greater is false")]
#[test_case("0=", &[0], &[-1]; "zero equal")]
#[test_case("0=", &[5], &[0]; "zero equal for non zero")]
#[test_case("0<", &[-3], &[-1]; "less than zero")]
#[test_case("0>", &[-3], &[0]; "greater than zero")]
#[test_case("U<", &[1, -1], &[-1]; "unsigned less")]
#[test_case("<", &[1, -1], &[0]; "signed less")]
#[test_case("AND", &[6, 3], &[2]; "and")]
#[test_case("AND", &[-1, 0], &[0]; "and for true false")]
#[test_case("OR", &[6, 3], &[7]; "or")]
#[test_case("XOR", &[6, 3], &[5]; "xor")]
#[test_case("INVERT", &[0], &[-1]; "invert false")]
#[test_case("INVERT", &[-1], &[0]; "invert true")]
#[test_case("INVERT", &[1], &[-2]; "invert number")]
fn comparison_and_logic(source: &str, init_stack: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(source, init_stack).unwrap(), expected);
}

#[test_case("DUP", &[1], &[1, 1]; "dup")]
#[test_case("DROP", &[1, 2], &[1]; "drop")]
#[test_case("SWAP", &[1, 2], &[2, 1]; "swap")]
#[test_case("SWAP SWAP", &[1, 2], &[1, 2]; "swap twice")]
#[test_case("OVER", &[1, 2], &[1, 2, 1]; "over")]
#[test_case("ROT", &[1, 2, 3], &[2, 3, 1]; "rot")]
#[test_case("?DUP", &[0], &[0]; "question dup of zero")]
#[test_case("?DUP", &[5], &[5, 5]; "question dup of non zero")]
#[test_case("2DUP", &[1, 2], &[1, 2, 1, 2]; "two dup")]
#[test_case("2DROP", &[1, 2, 3], &[1]; "two drop")]
#[test_case("2SWAP", &[1, 2, 3, 4], &[3, 4, 1, 2]; "two swap")]
#[test_case("2OVER", &[1, 2, 3, 4], &[1, 2, 3, 4, 1, 2]; "two over")]
#[test_case("DEPTH", &[7, 8], &[7, 8, 2]; "depth")]
#[test_case(">R R>", &[5], &[5]; "return stack round trip")]
#[test_case(">R @R R> +", &[5], &[10]; "return stack peek")]
#[test_case("CLEAR", &[1, 2, 3], &[]; "clear")]
fn stack_manipulation(source: &str, init_stack: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(source, init_stack).unwrap(), expected);
}

#[test_case("5 CONSTANT FIVE FIVE FIVE +", &[10]; "constant")]
#[test_case("VARIABLE X 7 X ! X @", &[7]; "store and fetch")]
#[test_case("VARIABLE X X", &[1000]; "first variable address")]
#[test_case("VARIABLE X VARIABLE Y Y", &[1001]; "second variable address")]
#[test_case("VARIABLE X X @", &[0]; "variables start at zero")]
#[test_case("VARIABLE X X !+ X !+ X @", &[2]; "increment in place")]
#[test_case("10 3 DO I LOOP", &[3, 4, 5, 6, 7, 8, 9]; "loop index")]
#[test_case("HEX ff", &[255]; "words read in the current radix")]
#[test_case("HEX 10", &[10]; "digit literals are always decimal")]
#[test_case("BINARY 1x DECIMAL", &[]; "unresolved word stops the statement")]
fn words_and_variables(source: &str, expected: &[i64]) {
    assert_eq!(eval_and_stack(source, &[]).unwrap(), expected);
}

#[test_case("DROP", ErrorKind::StackUnderflow; "drop on empty stack")]
#[test_case("1 +", ErrorKind::StackUnderflow; "add with one value")]
#[test_case("R>", ErrorKind::StackUnderflow; "empty return stack")]
#[test_case("1 0 /", ErrorKind::DivisionByZero; "divide by zero")]
#[test_case("1 0 MOD", ErrorKind::DivisionByZero; "mod by zero")]
#[test_case("1 ABORT", ErrorKind::UserAbort; "abort")]
#[test_case("LEAVE", ErrorKind::LoopExit; "leave outside of a loop")]
#[test_case("1 IF 2", ErrorKind::UnterminatedBlock; "if without then")]
#[test_case("5 0 DO I", ErrorKind::UnterminatedBlock; "do without loop")]
#[test_case("1 IF 2 ELSE 3 ELSE 4 THEN", ErrorKind::MalformedBlock; "second else")]
#[test_case("BEGIN 1 REPEAT", ErrorKind::MalformedBlock; "repeat without while")]
#[test_case("BEGIN 1 WHILE 2 UNTIL", ErrorKind::MalformedBlock; "while with until")]
#[test_case("BEGIN 1 WHILE 2 WHILE 3 REPEAT", ErrorKind::MalformedBlock; "two whiles")]
#[test_case("FORGET NOTHING", ErrorKind::UnknownWord; "forget unknown word")]
#[test_case("1234 @", ErrorKind::InvalidAddress; "fetch from unknown address")]
#[test_case("-1 EMIT", ErrorKind::InvalidCharacter; "emit invalid character")]
#[test_case(": BAD 1 >R ; BAD", ErrorKind::UnbalancedReturnStack; "unbalanced return stack")]
#[test_case("9223372036854775807 SPACES", ErrorKind::OutOfRange; "too many spaces")]
#[test_case("1 9223372036854775807 .RIGHT", ErrorKind::OutOfRange; "field too wide")]
#[test_case("QUIT", ErrorKind::ExitRequested; "quit")]
#[test_case("BYE", ErrorKind::ExitRequested; "bye")]
#[test_case("VARIABLE", ErrorKind::MissingWordName; "variable without a name")]
#[test_case(": 5 ;", ErrorKind::MissingWordName; "definition named by a number")]
#[test_case(": X 1", ErrorKind::MissingTerminator; "definition without semicolon")]
#[test_case("( open", ErrorKind::UnterminatedComment; "unterminated comment")]
#[test_case(".\" open", ErrorKind::UnterminatedString; "unterminated string")]
#[test_case("1 )", ErrorKind::UnexpectedToken; "bare close paren")]
fn errors(source: &str, expected: ErrorKind) {
    assert_eq!(eval_error(source), expected);
}
