/// Extraction of nested block bodies from a token stream.
pub mod block_scanner;

use crate::{
    add_native_word,
    lang::tokenizing::{Token, TokenList},
    runtime::{
        built_ins::control_words::block_scanner::{BlockScanner, ScannedBlock},
        data_structures::stack::Cell,
        error::{self, script_error_str, ErrorKind},
        interpreter::Interpreter,
    },
};
use std::rc::Rc;
use tracing::trace;

const IF_BLOCK: BlockScanner = BlockScanner {
    opener: "IF",
    closers: &["THEN"],
    separators: &["ELSE"],
};

const DO_BLOCK: BlockScanner = BlockScanner {
    opener: "DO",
    closers: &["LOOP", "+LOOP"],
    separators: &[],
};

const BEGIN_BLOCK: BlockScanner = BlockScanner {
    opener: "BEGIN",
    closers: &["UNTIL", "AGAIN", "REPEAT"],
    separators: &["WHILE"],
};

/// The loop index words, innermost loop first.
const LOOP_INDEX_WORDS: [&str; 3] = ["I", "J", "K"];

/// Pull the block that follows the control word out of the executing token stream.
fn scan_block(interpreter: &mut dyn Interpreter, scanner: &BlockScanner) -> error::Result<ScannedBlock> {
    let location = interpreter
        .current_location()
        .clone()
        .unwrap_or_else(|| location_here!());
    let stream = interpreter.token_stream()?;

    match scanner.scan(stream, &location) {
        Ok(block) => Ok(block),
        Err(error) => script_error_str(interpreter, error.kind(), error.error()),
    }
}

/// Run a loop, treating a `LEAVE` from inside of it as the end of the loop.
fn catch_loop_exit(result: error::Result<()>) -> error::Result<()> {
    match result {
        Err(error) if error.is_loop_exit() => {
            trace!("Loop exited by LEAVE.");
            Ok(())
        }

        other => other,
    }
}

/// Make a copy of a `DO` body with the loop index words replaced by the current index values.
/// Only the tokens that belong to this loop are touched, nested loops substitute their own bodies
/// when they run.
fn substitute_loop_indices(body: &TokenList, indices: &[Cell]) -> TokenList {
    let mut nesting = 0usize;

    body.iter()
        .map(|token| match token.word() {
            Some(word) if word == DO_BLOCK.opener => {
                nesting += 1;
                token.clone()
            }

            Some(word) if DO_BLOCK.closers.iter().any(|closer| *closer == word) => {
                nesting = nesting.saturating_sub(1);
                token.clone()
            }

            Some(word) if nesting == 0 => {
                let level = LOOP_INDEX_WORDS.iter().position(|name| *name == word);

                match level {
                    Some(level) if level < indices.len() => Token::IntValue(
                        token.location().clone(),
                        indices[indices.len() - 1 - level],
                    ),
                    _ => token.clone(),
                }
            }

            _ => token.clone(),
        })
        .collect()
}

/// Run the happy body if the flag is true, otherwise the sad body if there is one.
///
/// Signature: `flag -- `
fn word_if(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let block = scan_block(interpreter, &IF_BLOCK)?;

    if block.separators.len() > 1 {
        return script_error_str(
            interpreter,
            ErrorKind::MalformedBlock,
            "Only one ELSE is allowed in an IF block.",
        );
    }

    let flag = interpreter.pop_as_bool()?;
    let mut segments = block.segments.into_iter();

    let happy = segments.next().unwrap_or_default();
    let sad = segments.next();

    if flag {
        interpreter.execute_tokens(Rc::new(happy))
    } else if let Some(sad) = sad {
        interpreter.execute_tokens(Rc::new(sad))
    } else {
        Ok(())
    }
}

/// Run the body with the index counting from start towards the limit.  The body always runs at
/// least once.  `+LOOP` pops the step after every pass, the loop ends once the index reaches or
/// passes the limit in the direction of the step.
///
/// Signature: `limit start -- `
fn word_do(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let start = interpreter.pop()?;
    let limit = interpreter.pop()?;

    let block = scan_block(interpreter, &DO_BLOCK)?;
    let counted = block.closer_name() == "+LOOP";
    let body = block.segments.into_iter().next().unwrap_or_default();

    interpreter.loop_enter(start);

    let result = run_do_loop(interpreter, &body, start, limit, counted);

    interpreter.loop_exit();

    catch_loop_exit(result)
}

fn run_do_loop(
    interpreter: &mut dyn Interpreter,
    body: &TokenList,
    start: Cell,
    limit: Cell,
    counted: bool,
) -> error::Result<()> {
    let mut index = start;

    loop {
        interpreter.loop_update(index);

        let pass = substitute_loop_indices(body, interpreter.loop_indices());

        interpreter.execute_tokens(Rc::new(pass))?;

        let step = if counted { interpreter.pop()? } else { 1 };

        index = match index.checked_add(step) {
            Some(next) => next,
            None => break,
        };

        let done = if step >= 0 {
            index >= limit
        } else {
            index <= limit
        };

        if done {
            break;
        }
    }

    Ok(())
}

/// Loop over the body until a condition is met.  Which condition depends on the closing word.
///
/// Signature: ` -- `
fn word_begin(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let block = scan_block(interpreter, &BEGIN_BLOCK)?;
    let closer = block.closer_name().to_string();
    let while_count = block.separators.len();

    if while_count > 1 {
        return script_error_str(
            interpreter,
            ErrorKind::MalformedBlock,
            "Only one WHILE is allowed in a BEGIN block.",
        );
    }

    let mut segments = block.segments.into_iter().map(Rc::new);
    let body = segments.next().unwrap_or_default();

    let result = match (closer.as_str(), segments.next()) {
        ("UNTIL", None) => loop_until(interpreter, body),
        ("AGAIN", None) => loop_again(interpreter, body),
        ("REPEAT", Some(rest)) => loop_while(interpreter, body, rest),

        ("REPEAT", None) => {
            return script_error_str(
                interpreter,
                ErrorKind::MalformedBlock,
                "BEGIN ... REPEAT needs a WHILE.",
            );
        }

        (closer, _) => {
            return script_error_str(
                interpreter,
                ErrorKind::MalformedBlock,
                &format!("WHILE can not be used with {}.", closer),
            );
        }
    };

    catch_loop_exit(result)
}

fn loop_until(interpreter: &mut dyn Interpreter, body: Rc<TokenList>) -> error::Result<()> {
    loop {
        interpreter.execute_tokens(body.clone())?;

        if interpreter.pop_as_bool()? {
            return Ok(());
        }
    }
}

fn loop_again(interpreter: &mut dyn Interpreter, body: Rc<TokenList>) -> error::Result<()> {
    loop {
        interpreter.execute_tokens(body.clone())?;
    }
}

fn loop_while(
    interpreter: &mut dyn Interpreter,
    test: Rc<TokenList>,
    body: Rc<TokenList>,
) -> error::Result<()> {
    loop {
        interpreter.execute_tokens(test.clone())?;

        if !interpreter.pop_as_bool()? {
            return Ok(());
        }

        interpreter.execute_tokens(body.clone())?;
    }
}

/// Exit the innermost enclosing loop.
///
/// Signature: ` -- `
fn word_leave(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    script_error_str(
        interpreter,
        ErrorKind::LoopExit,
        "LEAVE used outside of a loop.",
    )
}

/// Register the structured control words.  These read their bodies straight out of the token
/// stream that invoked them.
pub fn register_control_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "IF",
        word_if,
        "Run code conditionally, IF ... THEN or IF ... ELSE ... THEN.",
        "flag -- "
    );

    add_native_word!(
        interpreter,
        "DO",
        word_do,
        "Counted loop, DO ... LOOP or DO ... +LOOP.",
        "limit start -- "
    );

    add_native_word!(
        interpreter,
        "BEGIN",
        word_begin,
        "Conditional loop, BEGIN ... UNTIL, BEGIN ... AGAIN or BEGIN ... WHILE ... REPEAT.",
        " -- "
    );

    add_native_word!(
        interpreter,
        "LEAVE",
        word_leave,
        "Exit the innermost enclosing loop.",
        " -- "
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenizing::tokenize_from_source;

    fn rendered(tokens: &TokenList) -> String {
        tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn only_this_loops_indices_are_substituted() {
        let body = tokenize_from_source("<test>", "I J 3 0 DO I J LOOP K").unwrap();
        let pass = substitute_loop_indices(&body, &[7, 2]);

        assert_eq!(rendered(&pass), "2 7 3 0 DO I J LOOP K");
    }

    #[test]
    fn stored_body_is_left_alone() {
        let body = tokenize_from_source("<test>", "I .").unwrap();
        let _ = substitute_loop_indices(&body, &[5]);

        assert_eq!(rendered(&body), "I .");
    }
}
