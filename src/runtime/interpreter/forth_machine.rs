use std::rc::Rc;
use tracing::{ debug, trace, warn };
use crate::{ lang::{ source_buffer::SourceLocation,
                     statements::{ Statement, StatementParser },
                     token_stream::TokenStream,
                     tokenizing::{ Token, TokenList } },
             runtime::{ built_ins::register_builtin_words,
                        data_structures::{ dictionary::{ Dictionary, WordInfo, WordOperation },
                                           stack::{ is_true, to_flag, Cell, Stack },
                                           variables::{ VariableStore, DEFAULT_VARIABLE_BASE } },
                        error::{ self,
                                 script_error,
                                 script_error_str,
                                 ErrorKind },
                        interpreter::{ CallItem,
                                       CallStack,
                                       CodeManagement,
                                       Interpreter,
                                       InterpreterStack,
                                       LoopManagement,
                                       WordManagement } } };



/// The path used in locations for source handed to `ForthMachine::execute`.
pub const INPUT_PATH: &str = "<input>";



/// Tunable limits and starting state for a machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig
{
    /// The radix the machine starts out in.
    pub radix: u32,

    /// How deeply user defined words may call each other.  Every level costs host stack, so the
    /// thread running the machine needs room for this many nested calls.
    pub max_call_depth: usize,

    /// The address handed to the first declared variable.
    pub variable_base: Cell
}


impl Default for MachineConfig
{
    fn default() -> Self
    {
        MachineConfig
            {
                radix: 10,
                max_call_depth: 1000,
                variable_base: DEFAULT_VARIABLE_BASE
            }
    }
}



/// The core interpreter implementation.  The machine owns all of the interpreter state and walks
/// the token lists directly, there is no compilation step.
pub struct ForthMachine
{
    config: MachineConfig,

    /// The primary operand stack.
    stack: Stack,

    /// Scratch storage for words, must be balanced by the end of every user word.
    return_stack: Stack,

    /// The radix used for printing and for reading words as numbers.
    radix: u32,

    /// The dictionary of words known by the machine.
    dictionary: Dictionary,

    /// The named variables and their cells.
    variables: VariableStore,

    /// The last known location execution has reached in the original source code.
    current_location: Option<SourceLocation>,

    /// The call stack used to keep track of the current execution context.
    call_stack: CallStack,

    /// One cursor for every token list currently being executed.  The innermost list is last.
    streams: Vec<TokenStream>,

    /// The active `DO` loop indices, one frame per user word invocation.
    loop_frames: Vec<Vec<Cell>>,

    /// How many user defined words are currently executing.
    call_depth: usize,

    /// Text printed by the statement currently being executed.
    output: String
}


impl Interpreter for ForthMachine
{
    fn variables(&self) -> &VariableStore
    {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableStore
    {
        &mut self.variables
    }

    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }

    fn radix(&self) -> u32
    {
        self.radix
    }

    fn set_radix(&mut self, radix: u32) -> error::Result<()>
    {
        if !(2..=36).contains(&radix)
        {
            return script_error(self,
                                ErrorKind::OutOfRange,
                                format!("Radix {} is out of range 2 to 36.", radix));
        }

        debug!(radix, "Switching radix.");
        self.radix = radix;

        Ok(())
    }
}


impl InterpreterStack for ForthMachine
{
    fn stack(&self) -> &Stack
    {
        &self.stack
    }

    fn push(&mut self, value: Cell)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Cell>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None        => script_error_str(self, ErrorKind::StackUnderflow, "Stack underflow.")
        }
    }

    fn pop_n(&mut self, count: usize) -> error::Result<Vec<Cell>>
    {
        match self.stack.pop_n(count)
        {
            Some(values) => Ok(values),
            None         => script_error(self,
                                         ErrorKind::StackUnderflow,
                                         format!("Stack underflow, needed {} values but found {}.",
                                                 count,
                                                 self.stack.len()))
        }
    }

    fn peek(&self) -> error::Result<Cell>
    {
        match self.stack.peek()
        {
            Some(value) => Ok(value),
            None        => script_error_str(self, ErrorKind::StackUnderflow, "Stack underflow.")
        }
    }

    fn pop_as_bool(&mut self) -> error::Result<bool>
    {
        Ok(is_true(self.pop()?))
    }

    fn push_bool(&mut self, value: bool)
    {
        self.stack.push(to_flag(value));
    }

    fn clear_stack(&mut self)
    {
        self.stack.clear();
    }

    fn return_stack(&self) -> &Stack
    {
        &self.return_stack
    }

    fn return_push(&mut self, value: Cell)
    {
        self.return_stack.push(value);
    }

    fn return_pop(&mut self) -> error::Result<Cell>
    {
        match self.return_stack.pop()
        {
            Some(value) => Ok(value),
            None        => script_error_str(self,
                                            ErrorKind::StackUnderflow,
                                            "Return stack underflow.")
        }
    }

    fn return_peek(&self) -> error::Result<Cell>
    {
        match self.return_stack.peek()
        {
            Some(value) => Ok(value),
            None        => script_error_str(self,
                                            ErrorKind::StackUnderflow,
                                            "Return stack underflow.")
        }
    }

    fn clear_return_stack(&mut self)
    {
        self.return_stack.clear();
    }
}


impl CodeManagement for ForthMachine
{
    fn next_token(&mut self) -> error::Result<Token>
    {
        let optional_token = self.streams.last_mut().and_then(|stream| stream.next());

        match optional_token
        {
            Some(token) => Ok(token),
            None        => script_error_str(self,
                                            ErrorKind::MissingWordName,
                                            "Reading past end of token stream.")
        }
    }

    fn next_token_word(&mut self) -> error::Result<( SourceLocation, String )>
    {
        let token = self.next_token()?;

        match token
        {
            Token::Word(location, word) => Ok(( location, word )),
            other => script_error(self,
                                  ErrorKind::MissingWordName,
                                  format!("Expected a word name, found {}.", other))
        }
    }

    fn token_stream(&mut self) -> error::Result<&mut TokenStream>
    {
        match self.streams.len()
        {
            0     => script_error_str(self, ErrorKind::Internal, "No token stream is active."),
            count => Ok(&mut self.streams[count - 1])
        }
    }

    fn execute_tokens(&mut self, tokens: Rc<TokenList>) -> error::Result<()>
    {
        self.streams.push(TokenStream::new(tokens));

        let result = self.run_stream();

        let _ = self.streams.pop();

        if let Err(error) = &result
        {
            if !error.is_loop_exit()
            {
                self.stack.clear();
            }
        }

        result
    }

    fn execute_statement(&mut self, statement: Statement) -> error::Result<String>
    {
        self.output.clear();

        match statement
        {
            Statement::Declaration(tokens) => self.define_word(tokens)?,

            Statement::Expression(tokens) =>
                {
                    trace!(tokens = tokens.len(), "Executing expression.");

                    if let Err(error) = self.execute_tokens(Rc::new(tokens))
                    {
                        // A LEAVE that no loop caught.
                        if error.is_loop_exit()
                        {
                            self.stack.clear();
                        }

                        debug!(kind = %error.kind(), "Statement failed: {}", error.error());
                        return Err(error);
                    }
                }
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn process_source(&mut self, path: &str, source: &str) -> error::Result<Vec<String>>
    {
        let mut outputs = Vec::new();

        for statement in StatementParser::new(path, source)
        {
            let statement = match statement
                {
                    Ok(statement) => statement,
                    Err(error) =>
                        {
                            self.stack.clear();
                            return Err(error);
                        }
                };

            outputs.push(self.execute_statement(statement)?);
        }

        Ok(outputs)
    }

    fn output(&self) -> &str
    {
        &self.output
    }

    fn write_output(&mut self, text: &str)
    {
        self.output.push_str(text);
    }
}


impl WordManagement for ForthMachine
{
    fn current_location(&self) -> &Option<SourceLocation>
    {
        &self.current_location
    }

    fn add_word(&mut self,
                file: String,
                line: usize,
                column: usize,
                name: String,
                operation: WordOperation,
                description: String,
                signature: String)
    {
        let location = SourceLocation::new_from_info(&file, line, column);
        let mut word_info = WordInfo::new(location, name, operation);

        word_info.description = description;
        word_info.signature = signature;

        self.dictionary.add(word_info);
    }

    fn find_word(&self, word: &str) -> Option<&WordInfo>
    {
        self.dictionary.get(word)
    }

    fn forget_word(&mut self, word: &str) -> error::Result<()>
    {
        match self.dictionary.forget(word)
        {
            Some(removed) =>
                {
                    debug!(word, removed = removed.len(), "Forgot words.");
                    Ok(())
                },

            None => script_error(self,
                                 ErrorKind::UnknownWord,
                                 format!("Word {} not found.", word))
        }
    }

    fn execute_word(&mut self, location: &SourceLocation, word: &WordInfo) -> error::Result<()>
    {
        self.current_location = Some(location.clone());
        self.call_stack.push(CallItem::new(word.name.clone(), location.clone()));

        let result = match &word.operation
            {
                WordOperation::Builtin(handler) => (*handler)(self),
                WordOperation::UserDefined(body) => self.execute_user_word(&word.name,
                                                                           body.clone())
            };

        let _ = self.call_stack.pop();

        result
    }

    fn call_stack(&self) -> &CallStack
    {
        &self.call_stack
    }
}


impl LoopManagement for ForthMachine
{
    fn loop_enter(&mut self, index: Cell)
    {
        match self.loop_frames.last_mut()
        {
            Some(frame) => frame.push(index),
            None        => self.loop_frames.push(vec![ index ])
        }
    }

    fn loop_update(&mut self, index: Cell)
    {
        if let Some(current) = self.loop_frames.last_mut().and_then(|frame| frame.last_mut())
        {
            *current = index;
        }
    }

    fn loop_exit(&mut self)
    {
        if let Some(frame) = self.loop_frames.last_mut()
        {
            let _ = frame.pop();
        }
    }

    fn loop_indices(&self) -> &[Cell]
    {
        match self.loop_frames.last()
        {
            Some(frame) => frame.as_slice(),
            None        => &[]
        }
    }
}


impl ForthMachine
{
    /// Create a machine with the default configuration and the full builtin catalog.
    pub fn new() -> ForthMachine
    {
        ForthMachine::with_config(MachineConfig::default())
    }

    /// Create a machine with a custom configuration.  A radix outside of 2 to 36 falls back to
    /// decimal.
    pub fn with_config(config: MachineConfig) -> ForthMachine
    {
        let radix =
            if (2..=36).contains(&config.radix)
            {
                config.radix
            }
            else
            {
                warn!(radix = config.radix, "Invalid starting radix, using decimal.");
                10
            };

        let mut machine = ForthMachine
            {
                radix,

                stack: Stack::new(),
                return_stack: Stack::new(),

                dictionary: Dictionary::new(),
                variables: VariableStore::new(config.variable_base),

                current_location: None,
                call_stack: CallStack::with_capacity(40),

                streams: Vec::new(),
                loop_frames: vec![ Vec::new() ],

                call_depth: 0,
                output: String::new(),

                config
            };

        register_builtin_words(&mut machine);
        debug!(words = machine.dictionary.len(), "Machine ready.");

        machine
    }

    /// The configuration the machine was created with.
    pub fn config(&self) -> &MachineConfig
    {
        &self.config
    }

    /// Parse the source text and run every statement in it, returning each statement's output.
    pub fn execute(&mut self, source: &str) -> error::Result<Vec<String>>
    {
        self.process_source(INPUT_PATH, source)
    }

    /// Record a `: name ... ;` definition.  The name is the first token of the body.
    fn define_word(&mut self, mut tokens: TokenList) -> error::Result<()>
    {
        if tokens.is_empty()
        {
            return script_error_str(self,
                                    ErrorKind::MissingWordName,
                                    "A definition must start with the name of the new word.");
        }

        match tokens.remove(0)
        {
            Token::Word(location, name) =>
                {
                    debug!(word = %name, body = tokens.len(), "Defining word.");

                    let mut word_info = WordInfo::new(location,
                                                      name,
                                                      WordOperation::UserDefined(Rc::new(tokens)));

                    word_info.description = "User defined word.".to_string();
                    self.dictionary.add(word_info);

                    Ok(())
                },

            other =>
                {
                    self.current_location = Some(other.location().clone());
                    script_error(self,
                                 ErrorKind::MissingWordName,
                                 format!("Expected a word name, found {}.", other))
                }
        }
    }

    /// Run the body of a user defined word in its own loop frame, then make sure the return stack
    /// was left as it was found.
    fn execute_user_word(&mut self, name: &str, body: Rc<TokenList>) -> error::Result<()>
    {
        if self.call_depth >= self.config.max_call_depth
        {
            return script_error(self,
                                ErrorKind::CallDepthExceeded,
                                format!("Maximum call depth of {} exceeded in {}.",
                                        self.config.max_call_depth,
                                        name));
        }

        let depth = self.return_stack.len();

        self.call_depth += 1;
        self.loop_frames.push(Vec::new());

        let result = self.execute_tokens(body);

        let _ = self.loop_frames.pop();
        self.call_depth -= 1;
        result?;

        if self.return_stack.len() != depth
        {
            let found = self.return_stack.len();

            self.return_stack.clear();

            return script_error(self,
                                ErrorKind::UnbalancedReturnStack,
                                format!("Word {} changed the return stack depth from {} to {}.",
                                        name,
                                        depth,
                                        found));
        }

        Ok(())
    }

    /// Step through the innermost token stream until it runs out or a word fails to resolve.
    fn run_stream(&mut self) -> error::Result<()>
    {
        while let Some(token) = self.streams.last_mut().and_then(|stream| stream.next())
        {
            self.current_location = Some(token.location().clone());

            match token
            {
                Token::QuotedString(_, text) => self.output.push_str(&text),
                Token::Comment(_, _) => {},
                Token::IntValue(_, value) => self.stack.push(value),

                Token::Word(location, word) =>
                    {
                        if !self.resolve_word(&location, &word)?
                        {
                            return Ok(());
                        }
                    },

                other @ (Token::Colon(_) | Token::Semicolon(_)) =>
                    {
                        return script_error(self,
                                            ErrorKind::Internal,
                                            format!("Unexpected token {} in executable code.",
                                                    other));
                    }
            }
        }

        Ok(())
    }

    /// Resolve a word as a variable, then a dictionary word, then a number in the current radix.
    /// Returns false if nothing matched, after printing the word with a question mark.
    fn resolve_word(&mut self, location: &SourceLocation, word: &str) -> error::Result<bool>
    {
        if let Some(address) = self.variables.address_of(word)
        {
            self.stack.push(address);
            return Ok(true);
        }

        if let Some(word_info) = self.dictionary.get(word).cloned()
        {
            self.execute_word(location, &word_info)?;
            return Ok(true);
        }

        if let Some(value) = parse_in_radix(word, self.radix)
        {
            self.stack.push(value);
            return Ok(true);
        }

        debug!(word, "Unresolved word.");

        self.output.push_str(word);
        self.output.push('?');

        Ok(false)
    }
}


impl Default for ForthMachine
{
    fn default() -> Self
    {
        Self::new()
    }
}



/// Read a word as a signed integer in the given radix.
fn parse_in_radix(word: &str, radix: u32) -> Option<Cell>
{
    if !(2..=36).contains(&radix)
    {
        return None;
    }

    Cell::from_str_radix(word, radix).ok()
}
