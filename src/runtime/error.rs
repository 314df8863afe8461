
use std::{ error::Error,
           process::Termination,
           fmt::{ self, Debug, Display, Formatter }, process::ExitCode };
use crate::{ runtime::interpreter::CallStack,
             lang::source_buffer::SourceLocation };

use super::interpreter::Interpreter;



pub type Result<T> = std::result::Result<T, ScriptError>;



/// The category of a failure.  Callers match on the kind rather than on the message text, most
/// importantly the loop constructs which only ever swallow `LoopExit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind
{
    /// A `(` comment ran into the end of the input.
    UnterminatedComment,

    /// A `."` string ran into the end of the input.
    UnterminatedString,

    /// A character that can not start a token, such as a bare `)`.
    UnexpectedToken,

    /// A `:` definition without its closing `;`.
    MissingTerminator,

    /// A `:` definition that does not start with a word to name it.
    MissingWordName,

    /// A structured control word never found its closing keyword.
    UnterminatedBlock,

    /// A structured control word found its markers in an invalid arrangement, for example a
    /// second `ELSE`.
    MalformedBlock,

    /// A word that was expected to be in the dictionary was not.
    UnknownWord,

    /// More values were popped than the stack held.
    StackUnderflow,

    /// Raised on purpose by `ABORT`.
    UserAbort,

    /// Raised by `LEAVE`.  Not really an error, loops catch it to exit early.
    LoopExit,

    /// A user defined word left values behind on the return stack.
    UnbalancedReturnStack,

    /// Integer division or remainder by zero.
    DivisionByZero,

    /// Fetch from an address that was never allocated.
    InvalidAddress,

    /// `EMIT` of a value that is not a character code.
    InvalidCharacter,

    /// A count, width or radix argument larger or smaller than the word accepts.
    OutOfRange,

    /// User defined words nested deeper than the machine allows.
    CallDepthExceeded,

    /// `QUIT` or `BYE`, a request to end the session.
    ExitRequested,

    /// Something the interpreter should never see, for example a stray `;` token in a body.
    Internal
}


impl ErrorKind
{
    /// Was the failure raised while turning characters into tokens?
    pub fn is_lex_error(&self) -> bool
    {
        matches!(self,
                 ErrorKind::UnterminatedComment
                 | ErrorKind::UnterminatedString
                 | ErrorKind::UnexpectedToken)
    }

    /// Was the failure raised while grouping tokens into statements?
    pub fn is_parse_error(&self) -> bool
    {
        matches!(self, ErrorKind::MissingTerminator | ErrorKind::MissingWordName)
    }
}


impl Display for ErrorKind
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        Debug::fmt(self, f)
    }
}



/// Any error that occurs during the tokenizing, parsing or execution of a script.
#[derive(Clone)]
pub struct ScriptError
{
    /// What sort of failure this is.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The description of the error.
    error: String,

    /// The script's call stack at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl Error for ScriptError
{
}


/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError
{
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


/// Pretty print the ScriptError for debugging the error that occurred within the script.
impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.error)?,
            None => write!(f, "{}", self.error)?
        }

        if let Some(call_stack) = self.call_stack.as_ref().filter(|stack| !stack.is_empty())
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev()
            {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{:?}: {}", self.kind, self)
    }
}


impl ScriptError
{
    /// Create a new ScriptError.
    pub fn new(kind: ErrorKind,
               location: Option<SourceLocation>,
               error: String,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError
            {
                kind,
                location,
                error,
                call_stack
            }
    }

    /// Create a new Script Error and wrap it in a Result::Err.
    pub fn new_as_result<T>(kind: ErrorKind,
                            location: Option<SourceLocation>,
                            error: String,
                            call_stack: Option<CallStack>) -> Result<T>
    {
        Err(ScriptError::new(kind, location, error, call_stack))
    }

    /// The category of the failure.
    pub fn kind(&self) -> ErrorKind
    {
        self.kind
    }

    /// Is this the `LEAVE` signal rather than a real failure?
    pub fn is_loop_exit(&self) -> bool
    {
        self.kind == ErrorKind::LoopExit
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The description of the error.
    pub fn error(&self) -> &String
    {
        &self.error
    }

    /// If available, the script's call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }
}


/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(ErrorKind::Internal, None, format!("I/O error: {}", error), None)
    }
}



/// A convenience function for creating a ScriptError and wrapping in in a Result::Err using the
/// interpreter's current location and call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: String) -> Result<T>
{
    let location = interpreter.current_location().clone();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(kind, location, message, Some(call_stack))
}



pub fn script_error_str<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: &str) -> Result<T>
{
    script_error(interpreter, kind, message.to_string())
}
