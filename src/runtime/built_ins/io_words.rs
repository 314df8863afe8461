use crate::{
    add_native_word,
    runtime::{
        data_structures::stack::{format_in_radix, format_unsigned_in_radix, Cell},
        error::{self, script_error, ErrorKind},
        interpreter::Interpreter,
    },
};

/// The widest field or run of spaces a single word will print.
const MAX_FIELD_WIDTH: usize = 4096;

/// Convert a popped count into a field width.  Zero and negative counts are an empty field.
fn field_width(interpreter: &dyn Interpreter, count: Cell) -> error::Result<usize> {
    let width = usize::try_from(count).unwrap_or(0);

    if width > MAX_FIELD_WIDTH {
        return script_error(
            interpreter,
            ErrorKind::OutOfRange,
            format!("Width {} is larger than the limit of {}.", count, MAX_FIELD_WIDTH),
        );
    }

    Ok(width)
}

/// Print the top value in the current radix, followed by a space.
///
/// Signature: `value -- `
fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;
    let text = format_in_radix(value, interpreter.radix());

    interpreter.write_output(&text);
    interpreter.write_output(" ");

    Ok(())
}

/// Print the top value's bits as an unsigned number, followed by a space.
///
/// Signature: `value -- `
fn word_print_unsigned(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;
    let text = format_unsigned_in_radix(value as u64, interpreter.radix());

    interpreter.write_output(&text);
    interpreter.write_output(" ");

    Ok(())
}

/// Print a value right aligned in a field of the given width.  No trailing space is added.
///
/// Signature: `value width -- `
fn word_print_right_aligned(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let width = interpreter.pop()?;
    let value = interpreter.pop()?;

    let text = format_in_radix(value, interpreter.radix());
    let width = field_width(interpreter, width)?;

    interpreter.write_output(&format!("{:>width$}", text, width = width));

    Ok(())
}

/// Print the whole data stack, bottom to top, prefixed by its depth.
///
/// Signature: ` -- `
fn word_print_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let mut text = interpreter.stack().dump(interpreter.radix());

    if !interpreter.stack().is_empty() {
        text.push(' ');
    }

    interpreter.write_output(&text);

    Ok(())
}

/// Print the character with the given code.
///
/// Signature: `code -- `
fn word_emit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let code = interpreter.pop()?;

    match u32::try_from(code).ok().and_then(char::from_u32) {
        Some(character) => {
            let mut buffer = [0; 4];

            interpreter.write_output(character.encode_utf8(&mut buffer));
            Ok(())
        }

        None => script_error(
            interpreter,
            ErrorKind::InvalidCharacter,
            format!("{} is not a valid character code.", code),
        ),
    }
}

/// Print a new line.
///
/// Signature: ` -- `
fn word_cr(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.write_output("\n");

    Ok(())
}

/// Print the given number of spaces.  Zero or a negative count prints nothing, more than the
/// field limit is an error.
///
/// Signature: `count -- `
fn word_spaces(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let count = interpreter.pop()?;
    let count = field_width(interpreter, count)?;

    interpreter.write_output(&" ".repeat(count));

    Ok(())
}

/// Register the words that write to the statement's output.
pub fn register_io_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        ".",
        word_print,
        "Print the top value in the current radix.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        "U.",
        word_print_unsigned,
        "Print the top value as an unsigned number.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        ".RIGHT",
        word_print_right_aligned,
        "Print a value right aligned in a field of the given width.",
        "value width -- "
    );

    add_native_word!(
        interpreter,
        ".S",
        word_print_stack,
        "Print the contents of the data stack.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "EMIT",
        word_emit,
        "Print the character with the given code.",
        "code -- "
    );

    add_native_word!(
        interpreter,
        "CR",
        word_cr,
        "Print a new line.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "SPACES",
        word_spaces,
        "Print the given number of spaces.",
        "count -- "
    );
}
