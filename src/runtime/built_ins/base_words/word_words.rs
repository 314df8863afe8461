use crate::{
    add_native_word,
    runtime::{
        error::{self, script_error, ErrorKind},
        interpreter::Interpreter,
    },
};

/// Forget the newest definition of the next word, and every word defined after it.
///
/// Signature: ` -- `
fn word_forget(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (_, name) = interpreter.next_token_word()?;

    interpreter.forget_word(&name)
}

/// Print the listing of every visible word.
///
/// Signature: ` -- `
fn word_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let listing = interpreter.dictionary().to_string();

    interpreter.write_output(&listing);

    Ok(())
}

/// Print the definition of the next word.  Native words show a placeholder in place of a body.
///
/// Signature: ` -- `
fn word_see(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (_, name) = interpreter.next_token_word()?;

    let rendered = match interpreter.find_word(&name) {
        Some(word_info) => word_info.to_string(),
        None => {
            return script_error(
                interpreter,
                ErrorKind::UnknownWord,
                format!("Word {} not found.", name),
            );
        }
    };

    interpreter.write_output(&rendered);
    interpreter.write_output("\n");

    Ok(())
}

/// Register the words that inspect and manage the dictionary.
pub fn register_word_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "FORGET",
        word_forget,
        "Remove the next word along with everything defined after it.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "WORDS",
        word_words,
        "List the words in the dictionary.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "SEE",
        word_see,
        "Show the definition of the next word.",
        " -- "
    );
}
