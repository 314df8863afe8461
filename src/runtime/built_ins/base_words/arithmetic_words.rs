use crate::{
    add_native_word,
    runtime::{
        data_structures::stack::Cell,
        error::{self, script_error_str, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Helper function to handle binary math operations.  The second value from the top is the left
/// hand operand.  The stack operations are handled here.
fn math_op(interpreter: &mut dyn Interpreter, op: fn(Cell, Cell) -> Cell) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(op(a, b));

    Ok(())
}

/// Helper function to handle unary math operations.
fn unary_op(interpreter: &mut dyn Interpreter, op: fn(Cell) -> Cell) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push(op(value));

    Ok(())
}

/// Pop the divisor and dividend, failing on a divisor of zero.
fn pop_division_operands(interpreter: &mut dyn Interpreter) -> error::Result<(Cell, Cell)> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    if b == 0 {
        return script_error_str(interpreter, ErrorKind::DivisionByZero, "Division by zero.");
    }

    Ok((a, b))
}

/// Signature: `a b -- a+b`
fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    math_op(interpreter, Cell::wrapping_add)
}

/// Signature: `a b -- a-b`
fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    math_op(interpreter, Cell::wrapping_sub)
}

/// Signature: `a b -- a*b`
fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    math_op(interpreter, Cell::wrapping_mul)
}

/// Divide, truncating toward zero.
///
/// Signature: `a b -- a/b`
fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_division_operands(interpreter)?;

    interpreter.push(a.wrapping_div(b));

    Ok(())
}

/// The remainder takes the sign of the dividend.
///
/// Signature: `a b -- remainder`
fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_division_operands(interpreter)?;

    interpreter.push(a.wrapping_rem(b));

    Ok(())
}

/// Signature: `a b -- remainder quotient`
fn word_divide_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_division_operands(interpreter)?;

    interpreter.push(a.wrapping_rem(b));
    interpreter.push(a.wrapping_div(b));

    Ok(())
}

/// Register the integer arithmetic words.
pub fn register_arithmetic_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "+",
        word_add,
        "Add 2 numbers together.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "-",
        word_subtract,
        "Subtract the top number from the one below it.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "*",
        word_multiply,
        "Multiply 2 numbers.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "/",
        word_divide,
        "Divide 2 numbers, truncating toward zero.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "MOD",
        word_mod,
        "Get the remainder of dividing 2 numbers.",
        "a b -- remainder"
    );

    add_native_word!(
        interpreter,
        "/MOD",
        word_divide_mod,
        "Divide 2 numbers, giving both the remainder and the quotient.",
        "a b -- remainder quotient"
    );

    add_native_word!(
        interpreter,
        "ABS",
        |interpreter| unary_op(interpreter, Cell::wrapping_abs),
        "Get the absolute value of a number.",
        "n -- |n|"
    );

    add_native_word!(
        interpreter,
        "NEGATE",
        |interpreter| unary_op(interpreter, Cell::wrapping_neg),
        "Flip the sign of a number.",
        "n -- -n"
    );

    add_native_word!(
        interpreter,
        "MIN",
        |interpreter| math_op(interpreter, Cell::min),
        "Keep the smaller of 2 numbers.",
        "a b -- min"
    );

    add_native_word!(
        interpreter,
        "MAX",
        |interpreter| math_op(interpreter, Cell::max),
        "Keep the larger of 2 numbers.",
        "a b -- max"
    );
}
