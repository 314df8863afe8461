/// The stacks, the dictionary and the variable store used by the machine.
pub mod data_structures;

/// Module for defining the built-in native words that are available to the interpreter.
pub mod built_ins;

/// Module for defining the error reporting of the interpreter.
pub mod error;

/// Module for defining the core functionality of the interpreter.  This includes the execution
/// engine as well as tools for managing and examining the interpreter's state.
pub mod interpreter;
