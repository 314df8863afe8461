//! A small Forth style interpreter that runs its source directly from the token stream.
//!
//! Source text is tokenized, grouped into statements and executed against a dictionary of words
//! that work on an integer data stack.  Structured control words such as `IF` and `DO` pull their
//! bodies straight out of the token stream as they run.

/// Module for managing source code, tokens and statements.
#[macro_use]
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
#[macro_use]
pub mod runtime;

pub use runtime::{
    error::{ErrorKind, Result, ScriptError},
    interpreter::{
        CodeManagement, Interpreter, InterpreterStack, LoopManagement, WordManagement,
        forth_machine::{ForthMachine, MachineConfig},
    },
};
