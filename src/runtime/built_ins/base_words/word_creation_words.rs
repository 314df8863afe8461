use crate::{
    add_native_word,
    runtime::{
        data_structures::dictionary::WordOperation,
        error::{self, script_error, ErrorKind},
        interpreter::{native_handler, Interpreter},
    },
};
use tracing::debug;

/// Declare a new variable.  The name is pulled from the next token, the new cell starts out as
/// zero.  Declaring an existing variable again keeps its address.
///
/// Signature: ` -- `
fn word_variable(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (_, name) = interpreter.next_token_word()?;
    let address = interpreter.variables_mut().allocate(&name);

    debug!(variable = %name, address, "Declared variable.");

    Ok(())
}

/// Define a new word that pushes a fixed value.  The name is pulled from the next token.
///
/// Signature: `value -- `
fn word_constant(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (location, name) = interpreter.next_token_word()?;
    let value = interpreter.pop()?;

    debug!(constant = %name, value, "Defining constant.");

    interpreter.add_word(
        location.path().clone(),
        location.line(),
        location.column(),
        name,
        WordOperation::Builtin(native_handler(move |interpreter| {
            interpreter.push(value);
            Ok(())
        })),
        "Constant value.".to_string(),
        " -- value".to_string(),
    );

    Ok(())
}

/// Write a value to a variable's cell.
///
/// Signature: `value address -- `
fn word_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let address = interpreter.pop()?;
    let value = interpreter.pop()?;

    interpreter.variables_mut().store(address, value);

    Ok(())
}

/// Read the value of a variable's cell.  Reading an address that was never allocated is an error.
///
/// Signature: `address -- value`
fn word_fetch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let address = interpreter.pop()?;

    match interpreter.variables().fetch(address) {
        Some(value) => {
            interpreter.push(value);
            Ok(())
        }

        None => script_error(
            interpreter,
            ErrorKind::InvalidAddress,
            format!("Address {} was never allocated.", address),
        ),
    }
}

/// Register the words that create variables and constants and access their values.
pub fn register_word_creation_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "VARIABLE",
        word_variable,
        "Declare a variable named by the next word.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "CONSTANT",
        word_constant,
        "Define the next word as a constant holding the top value.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        "!",
        word_store,
        "Store a value at a variable's address.",
        "value address -- "
    );

    add_native_word!(
        interpreter,
        "@",
        word_fetch,
        "Fetch the value at a variable's address.",
        "address -- value"
    );
}
