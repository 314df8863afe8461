/// Module for the managing source code, and the location of things found within it.
#[macro_use]
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for grouping tokens into the top level statements of a script.  Either word definitions
/// or plain expressions.
pub mod statements;

/// The shared token cursor that is driven by the execution engine, and read from by the words that
/// consume their own bodies.
pub mod token_stream;
