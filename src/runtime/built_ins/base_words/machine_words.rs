use crate::{
    add_native_word,
    lang::tokenizing::Token,
    runtime::{
        error::{self, script_error, script_error_str, ErrorKind},
        interpreter::Interpreter,
    },
};
use lazy_static::lazy_static;
use std::collections::BTreeMap;

lazy_static! {
    /// The named radixes.  Each name is registered as a word that switches the machine over to
    /// that radix.
    pub static ref RADIX_NAMES: BTreeMap<&'static str, u32> = BTreeMap::from([
        ("BINARY", 2),
        ("OCTAL", 8),
        ("DECIMAL", 10),
        ("HEX", 16),
    ]);
}

/// Look up a radix by its name, ignoring case.
pub fn radix_from_name(name: &str) -> Option<u32> {
    RADIX_NAMES.get(name.to_uppercase().as_str()).copied()
}

/// Empty both the data and the return stacks.
///
/// Signature: `... -- `
fn word_clear(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.clear_stack();
    interpreter.clear_return_stack();

    Ok(())
}

/// Abort execution if the flag is true.  A quoted string directly after `ABORT` is used as the
/// message, it is consumed whether or not the abort happens.
///
/// Signature: `flag -- `
fn word_abort(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let flag = interpreter.pop_as_bool()?;

    let message = match interpreter.token_stream()?.peek(0) {
        Some(Token::QuotedString(_, text)) => Some(text.trim().to_string()),
        _ => None,
    };

    if message.is_some() {
        let _ = interpreter.next_token()?;
    }

    if !flag {
        return Ok(());
    }

    match message {
        Some(message) if !message.is_empty() => {
            script_error(interpreter, ErrorKind::UserAbort, message)
        }
        _ => script_error_str(interpreter, ErrorKind::UserAbort, "Aborted."),
    }
}

/// Request the end of the session.
///
/// Signature: ` -- `
fn word_quit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    script_error_str(interpreter, ErrorKind::ExitRequested, "Exit requested.")
}

/// Register the words that read or change the state of the machine itself.
pub fn register_machine_words(interpreter: &mut dyn Interpreter) {
    for (name, radix) in RADIX_NAMES.iter() {
        let radix = *radix;

        add_native_word!(
            interpreter,
            name,
            move |interpreter| interpreter.set_radix(radix),
            format!("Switch to radix {} for printing and reading numbers.", radix),
            " -- "
        );
    }

    add_native_word!(
        interpreter,
        "CLEAR",
        word_clear,
        "Empty both the data and return stacks.",
        "... -- "
    );

    add_native_word!(
        interpreter,
        "ABORT",
        word_abort,
        "Abort execution with an optional message if the flag is true.",
        "flag -- "
    );

    add_native_word!(
        interpreter,
        "QUIT",
        word_quit,
        "End the session.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "BYE",
        word_quit,
        "End the session.",
        " -- "
    );
}
