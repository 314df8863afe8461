use crate::{
    lang::{
        source_buffer::SourceLocation,
        statements::Statement,
        token_stream::TokenStream,
        tokenizing::{Token, TokenList},
    },
    runtime::{
        data_structures::{
            dictionary::{Dictionary, WordInfo, WordOperation},
            stack::{Cell, Stack},
            variables::VariableStore,
        },
        error,
    },
};
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

pub mod forth_machine;

/// A call stack item is a record of the executing word's name ad the location within the original
/// source code from which it was found.  This items are read-only and the fields are accessed by
/// member functions.
#[derive(Clone, Debug)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was the execution of this word found?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

/// Make sure that this word can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// Type to represent a call stack.  This is a stack of call items currently being executed by the
/// interpreter.  This is used to help track errors and provide a scripts stack trace to the user.
pub type CallStack = Vec<CallItem>;

/// Trait for managing the interpreter's data and return stacks.  Intended to be called by words,
/// both native and user defined.
pub trait InterpreterStack {
    /// Use to examine the full data stack when required.  One example is for the stack dump word
    /// `.S`.
    fn stack(&self) -> &Stack;

    /// Push a cell onto the data stack.
    fn push(&mut self, value: Cell);

    /// Pop a cell from the data stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Cell>;

    /// Pop `count` cells at once, top of the stack first.  Nothing is popped if there are not
    /// enough cells.
    fn pop_n(&mut self, count: usize) -> error::Result<Vec<Cell>>;

    /// Read the top cell without popping it.
    fn peek(&self) -> error::Result<Cell>;

    /// Pop the top cell and test it as a flag.  Any non-zero value is true.
    fn pop_as_bool(&mut self) -> error::Result<bool>;

    /// Push the canonical representation of the flag.
    fn push_bool(&mut self, value: bool);

    fn clear_stack(&mut self);

    /// The auxiliary return stack.
    fn return_stack(&self) -> &Stack;

    fn return_push(&mut self, value: Cell);

    fn return_pop(&mut self) -> error::Result<Cell>;

    fn return_peek(&self) -> error::Result<Cell>;

    fn clear_return_stack(&mut self);
}

/// Trait for executing code and managing the incoming token streams.
///
/// Every token list the interpreter runs gets its own stream.  Words that need to read ahead in the
/// source, like `VARIABLE` or `IF`, consume tokens from the stream that invoked them.
pub trait CodeManagement {
    /// Get the next token from the current token stream.  It's an error if the stream is used up.
    fn next_token(&mut self) -> error::Result<Token>;

    /// Get the next token as a word from the current token stream.  This only succeeds if the next
    /// token is a word.
    fn next_token_word(&mut self) -> error::Result<(SourceLocation, String)>;

    /// Access the token stream currently being executed.
    fn token_stream(&mut self) -> error::Result<&mut TokenStream>;

    /// Run a list of tokens against the machine.  On failure the data stack is cleared before the
    /// error is returned, unless the failure is the `LEAVE` signal.
    fn execute_tokens(&mut self, tokens: Rc<TokenList>) -> error::Result<()>;

    /// Execute a single top level statement, returning the text it printed.
    fn execute_statement(&mut self, statement: Statement) -> error::Result<String>;

    /// Parse and execute source code one statement at a time.  The result holds the printed output
    /// of each statement.
    ///
    /// The path parameter is used to represent the source code in things like call stacks and error
    /// reporting.  For example, the repl uses a path of "\<repl\>" to represent source code entered
    /// by the user.
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<Vec<String>>;

    /// The text printed so far by the statement being executed.
    fn output(&self) -> &str;

    /// Append text to the current statement's output.
    fn write_output(&mut self, text: &str);
}

/// Definition of a word handler function.  This is the function that is called when a native word
/// is to be executed.  Can be a lambda, a callable object or a Rust function.
pub type WordHandler = dyn Fn(&mut dyn Interpreter) -> error::Result<()>;

/// Wrap a native function or closure for registration as a word.
pub fn native_handler<F>(handler: F) -> Rc<WordHandler>
where
    F: Fn(&mut dyn Interpreter) -> error::Result<()> + 'static,
{
    Rc::new(handler)
}

/// Simplify registering a native word with the interpreter.
///
/// Required parameters are, the interpreter instance to register with.  The name of the word to
/// register.  The word function handler to execute for the word.  A simple description of the word.
/// As well as the word's stack signature.
#[macro_export]
macro_rules! add_native_word {
    (
        $interpreter:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use $crate::runtime::{
            data_structures::dictionary::WordOperation, interpreter::native_handler,
        };

        // Register the word while recording where in the source code the word was registered
        // from.
        $interpreter.add_word(
            file!().to_string(),
            line!() as usize,
            column!() as usize,
            $name.to_string(),
            WordOperation::Builtin(native_handler($function)),
            $description.to_string(),
            $signature.to_string(),
        );
    }};
}

/// Trait for managing and executing words known to the interpreter.
pub trait WordManagement {
    /// If currently set, this represents the current executing location in the original Forth
    /// source code.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// Add a new word to the interpreter's dictionary.  This can be a native word or a user defined
    /// word.  A word already using the name is shadowed.
    #[allow(clippy::too_many_arguments)]
    fn add_word(
        &mut self,
        file: String,
        line: usize,
        column: usize,
        name: String,
        operation: WordOperation,
        description: String,
        signature: String,
    );

    /// Find a word in the interpreter's dictionary by name.
    fn find_word(&self, word: &str) -> Option<&WordInfo>;

    /// Forget the newest definition of the word, along with everything defined after it.
    fn forget_word(&mut self, word: &str) -> error::Result<()>;

    /// Execute a word by WordInfo.  Supply a source location to represent where the word was
    /// executed from.  Use the macro `location_here!()` to get the current location in the Rust
    /// source code if the word is executed from native code.
    fn execute_word(&mut self, location: &SourceLocation, word: &WordInfo) -> error::Result<()>;

    /// The current script execution call stack.
    fn call_stack(&self) -> &CallStack;
}

/// Trait for tracking the indices of the active `DO` loops.
///
/// Indices are kept in frames.  Every user defined word invocation gets a fresh frame, so `I`
/// inside a word's body refers to a loop within that body.
pub trait LoopManagement {
    /// Enter a new loop in the current frame, starting at the given index.
    fn loop_enter(&mut self, index: Cell);

    /// Update the index of the innermost active loop.
    fn loop_update(&mut self, index: Cell);

    /// Leave the innermost active loop.
    fn loop_exit(&mut self);

    /// The indices of the loops active in the current frame, outermost first.
    fn loop_indices(&self) -> &[Cell];
}

/// Core interpreter trait.
///
/// This trait defines and brings together the traits that define the core functionality of the
/// interpreter.  Managing the stacks, executing tokens and words, as well as the machine wide
/// state such as the variables and the current radix.
pub trait Interpreter: InterpreterStack + CodeManagement + WordManagement + LoopManagement {
    /// The named variables known to the interpreter.
    fn variables(&self) -> &VariableStore;

    fn variables_mut(&mut self) -> &mut VariableStore;

    /// The current word dictionary of words known to the interpreter.
    fn dictionary(&self) -> &Dictionary;

    /// The numeric base used for printing, and for parsing words as numbers.
    fn radix(&self) -> u32;

    /// Change the numeric base.  Only bases 2 through 36 are accepted.
    fn set_radix(&mut self, radix: u32) -> error::Result<()>;
}
