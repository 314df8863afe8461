use crate::{
    add_native_word,
    runtime::{error, interpreter::Interpreter},
};

/// Move the top of the data stack over to the return stack.
///
/// Signature: `value -- `
fn word_to_return(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.return_push(value);

    Ok(())
}

/// Move the top of the return stack back to the data stack.
///
/// Signature: ` -- value`
fn word_from_return(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.return_pop()?;

    interpreter.push(value);

    Ok(())
}

/// Copy the top of the return stack to the data stack.
///
/// Signature: ` -- value`
fn word_fetch_return(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.return_peek()?;

    interpreter.push(value);

    Ok(())
}

/// Print the whole return stack, bottom to top, prefixed by its depth.
///
/// Signature: ` -- `
fn word_print_return_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let mut text = interpreter.return_stack().dump(interpreter.radix());

    if !interpreter.return_stack().is_empty() {
        text.push(' ');
    }

    interpreter.write_output(&text);

    Ok(())
}

/// Register the words that move values between the data and return stacks.  A user word must leave
/// the return stack as deep as it found it.
pub fn register_return_stack_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        ">R",
        word_to_return,
        "Move a value to the return stack.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        "R>",
        word_from_return,
        "Move a value back from the return stack.",
        " -- value"
    );

    add_native_word!(
        interpreter,
        "@R",
        word_fetch_return,
        "Copy the top of the return stack.",
        " -- value"
    );

    add_native_word!(
        interpreter,
        ".R",
        word_print_return_stack,
        "Print the contents of the return stack.",
        " -- "
    );
}
