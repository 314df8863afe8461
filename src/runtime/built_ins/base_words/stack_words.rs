use crate::{
    add_native_word,
    runtime::{error, interpreter::Interpreter},
};

/// Duplicate the top value on the data stack.
///
/// Signature: `value -- value value`
fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.push(value);
    interpreter.push(value);

    Ok(())
}

/// Drop the top value on the data stack.
///
/// Signature: `value -- `
fn word_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop()?;

    Ok(())
}

/// Swap the top 2 values on the data stack.
///
/// Signature: `a b -- b a`
fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(a);

    Ok(())
}

/// Make a copy of the second value and place it on top.
///
/// Signature: `a b -- a b a`
fn word_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(a);
    interpreter.push(b);
    interpreter.push(a);

    Ok(())
}

/// Rotate the third value up to the top of the stack.
///
/// Signature: `a b c -- b c a`
fn word_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(c);
    interpreter.push(a);

    Ok(())
}

/// Duplicate the top value only if it's non-zero.
///
/// Signature: `value -- value value | 0`
fn word_question_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.peek()?;

    if value != 0 {
        interpreter.push(value);
    }

    Ok(())
}

/// Signature: `a b -- a b a b`
fn word_two_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    for value in [a, b, a, b] {
        interpreter.push(value);
    }

    Ok(())
}

/// Signature: `a b -- `
fn word_two_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let _ = interpreter.pop_n(2)?;

    Ok(())
}

/// Signature: `a b c d -- c d a b`
fn word_two_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let d = interpreter.pop()?;
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    for value in [c, d, a, b] {
        interpreter.push(value);
    }

    Ok(())
}

/// Signature: `a b c d -- a b c d a b`
fn word_two_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let d = interpreter.pop()?;
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    for value in [a, b, c, d, a, b] {
        interpreter.push(value);
    }

    Ok(())
}

/// Get the depth of the data stack before calling this word.
///
/// Signature: ` -- depth`
fn word_depth(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.stack().len() as i64;

    interpreter.push(depth);

    Ok(())
}

/// Register the data stack manipulation words.
pub fn register_stack_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "DUP",
        word_dup,
        "Duplicate the top value on the data stack.",
        "value -- value value"
    );

    add_native_word!(
        interpreter,
        "DROP",
        word_drop,
        "Discard the top value on the data stack.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        "SWAP",
        word_swap,
        "Swap the top 2 values on the data stack.",
        "a b -- b a"
    );

    add_native_word!(
        interpreter,
        "OVER",
        word_over,
        "Copy the second value to the top of the stack.",
        "a b -- a b a"
    );

    add_native_word!(
        interpreter,
        "ROT",
        word_rot,
        "Rotate the third value to the top of the stack.",
        "a b c -- b c a"
    );

    add_native_word!(
        interpreter,
        "?DUP",
        word_question_dup,
        "Duplicate the top value if it isn't zero.",
        "value -- value value | 0"
    );

    add_native_word!(
        interpreter,
        "2DUP",
        word_two_dup,
        "Duplicate the top pair of values.",
        "a b -- a b a b"
    );

    add_native_word!(
        interpreter,
        "2DROP",
        word_two_drop,
        "Discard the top pair of values.",
        "a b -- "
    );

    add_native_word!(
        interpreter,
        "2SWAP",
        word_two_swap,
        "Swap the top 2 pairs of values.",
        "a b c d -- c d a b"
    );

    add_native_word!(
        interpreter,
        "2OVER",
        word_two_over,
        "Copy the second pair of values to the top.",
        "a b c d -- a b c d a b"
    );

    add_native_word!(
        interpreter,
        "DEPTH",
        word_depth,
        "Get the depth of the stack before calling this word.",
        " -- depth"
    );
}
