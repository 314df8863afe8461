use crate::{
    add_native_word,
    runtime::{data_structures::stack::Cell, error, interpreter::Interpreter},
};

/// Helper function to handle comparisons.  The comparison is passed in as an argument, the result
/// is pushed as a canonical flag.
fn compare_op(interpreter: &mut dyn Interpreter, op: fn(Cell, Cell) -> bool) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push_bool(op(a, b));

    Ok(())
}

/// Helper function to compare the top value against zero.
fn zero_compare_op(interpreter: &mut dyn Interpreter, op: fn(Cell) -> bool) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push_bool(op(value));

    Ok(())
}

/// Helper function to handle bit logic operations.  The actual bit operation is passed in as an
/// argument.  The stack operations are handled here.
fn logic_bit_op(interpreter: &mut dyn Interpreter, bop: fn(Cell, Cell) -> Cell) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(bop(a, b));

    Ok(())
}

/// Compare the raw bits of 2 values as unsigned numbers.
///
/// Signature: `a b -- bool`
fn word_unsigned_less_than(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    compare_op(interpreter, |a, b| (a as u64) < (b as u64))
}

/// Flip every bit of the value, so TRUE becomes FALSE and back.
///
/// Signature: `value -- inverted`
fn word_invert(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push(!value);

    Ok(())
}

/// Register the comparison and bitwise logic words.
pub fn register_math_logic_and_bit_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "=",
        |interpreter| compare_op(interpreter, |a, b| a == b),
        "Are 2 values equal?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "<>",
        |interpreter| compare_op(interpreter, |a, b| a != b),
        "Are 2 values different?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "<",
        |interpreter| compare_op(interpreter, |a, b| a < b),
        "Is a less than b?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        ">",
        |interpreter| compare_op(interpreter, |a, b| a > b),
        "Is a greater than b?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "U<",
        word_unsigned_less_than,
        "Is a less than b when both are read as unsigned?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "0=",
        |interpreter| zero_compare_op(interpreter, |value| value == 0),
        "Is the value zero?",
        "value -- bool"
    );

    add_native_word!(
        interpreter,
        "0<",
        |interpreter| zero_compare_op(interpreter, |value| value < 0),
        "Is the value negative?",
        "value -- bool"
    );

    add_native_word!(
        interpreter,
        "0>",
        |interpreter| zero_compare_op(interpreter, |value| value > 0),
        "Is the value positive?",
        "value -- bool"
    );

    add_native_word!(
        interpreter,
        "AND",
        |interpreter| logic_bit_op(interpreter, |a, b| a & b),
        "Bitwise AND the 2 values.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "OR",
        |interpreter| logic_bit_op(interpreter, |a, b| a | b),
        "Bitwise OR the 2 values.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "XOR",
        |interpreter| logic_bit_op(interpreter, |a, b| a ^ b),
        "Bitwise XOR the 2 values.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "INVERT",
        word_invert,
        "Flip every bit of the value.",
        "value -- inverted"
    );
}
