/// The core words of the language.
pub mod base_words;

/// Words that write to the statement output.
pub mod io_words;

/// The structured control words and the scanner that extracts their bodies.
pub mod control_words;

use crate::runtime::{
    built_ins::{
        base_words::register_base_words, control_words::register_control_words,
        io_words::register_io_words,
    },
    interpreter::Interpreter,
};
use tracing::error;

/// Words defined in the language itself on top of the native words.
const PRELUDE: &str = "
    : 1+ 1 + ;
    : 1- 1 - ;
    : 2+ 2 + ;
    : 2- 2 - ;
    : 2* 2 * ;
    : 2/ 2 / ;

    : TRUE -1 ;
    : FALSE 0 ;

    ( addr -- ) : ? @ . ;
    ( addr -- ) : !+ DUP @ 1 + SWAP ! ;
";

/// Register every builtin word, native words first, then the words of the prelude which are built
/// out of them.
pub fn register_builtin_words(interpreter: &mut dyn Interpreter) {
    register_base_words(interpreter);
    register_io_words(interpreter);
    register_control_words(interpreter);

    if let Err(error) = interpreter.process_source("<prelude>", PRELUDE) {
        error!("Failed to define the prelude words: {}", error);
    }
}
