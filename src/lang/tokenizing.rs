use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    iter::FusedIterator,
};

/// A token is a simple unit of the language.  Every variant also holds the location in the original
/// source code where the token ended.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// The `:` that opens a word definition.
    Colon(SourceLocation),

    /// The `;` that closes a word definition.
    Semicolon(SourceLocation),

    /// A run of decimal digits, optionally negative.
    IntValue(SourceLocation, i64),

    /// A word in the language to be executed.
    Word(SourceLocation, String),

    /// The text of a `."` string, without the delimiters.
    QuotedString(SourceLocation, String),

    /// The text of a `( ... )` comment, without the parentheses.
    Comment(SourceLocation, String),
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

/// Tokens print the way they would be written in the source code.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::Colon(_) => write!(f, ":"),
            Token::Semicolon(_) => write!(f, ";"),
            Token::IntValue(_, value) => write!(f, "{}", value),
            Token::Word(_, word) => write!(f, "{}", word),
            Token::QuotedString(_, text) => write!(f, ".\"{}\"", text),
            Token::Comment(_, text) => write!(f, "({})", text),
        }
    }
}

/// Debug output names the variant so that token lists can be compared at a glance.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::Colon(location) => write!(f, "{}: Colon", location),
            Token::Semicolon(location) => write!(f, "{}: Semicolon", location),
            Token::IntValue(location, value) => write!(f, "{}: IntValue({})", location, value),
            Token::Word(location, word) => write!(f, "{}: Word({})", location, word),
            Token::QuotedString(location, text) => {
                write!(f, "{}: QuotedString({:?})", location, text)
            }
            Token::Comment(location, text) => write!(f, "{}: Comment({})", location, text),
        }
    }
}

impl Token {
    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        match self {
            Token::Colon(location) => location,
            Token::Semicolon(location) => location,
            Token::IntValue(location, _) => location,
            Token::Word(location, _) => location,
            Token::QuotedString(location, _) => location,
            Token::Comment(location, _) => location,
        }
    }

    /// Check if the token is a word.
    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_, _))
    }

    /// The name of a word token, or None for every other kind of token.
    pub fn word(&self) -> Option<&str> {
        match self {
            Token::Word(_, word) => Some(word),
            _ => None,
        }
    }

    /// Check if this is a word token with exactly the given name.
    pub fn is_word_named(&self, name: &str) -> bool {
        self.word() == Some(name)
    }

    /// Check if the token is the `:` that starts a definition.
    pub fn is_colon(&self) -> bool {
        matches!(self, Token::Colon(_))
    }

    /// Check if the token is the `;` that ends a definition.
    pub fn is_semicolon(&self) -> bool {
        matches!(self, Token::Semicolon(_))
    }
}

/// Check if the given character is considered whitespace.
fn is_whitespace(next: char) -> bool {
    next == ' ' || next == '\t' || next == '\r' || next == '\n'
}

/// Does it look like we're dealing with a numeric literal?  Only plain decimal digits with an
/// optional leading minus sign qualify, radix specific parsing happens at run time.
fn is_number(text: &str) -> bool {
    let digits = match text.strip_prefix('-') {
        Some(rest) => rest,
        None => text,
    };

    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Turns source text into a lazy sequence of tokens.  Each call to `next` pulls just enough
/// characters from the source buffer to produce one token.  Once an error has been returned the
/// tokenizer is exhausted.
pub struct Tokenizer<'a> {
    buffer: SourceBuffer<'a>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over the given source.  The path is only used for locations.
    pub fn new(path: &str, source: &'a str) -> Self {
        Tokenizer {
            buffer: SourceBuffer::new(path, source),
            failed: false,
        }
    }

    /// Skip over whitespace in the text.  Stopping only at either the end of the buffer or the
    /// next non-whitespace character.
    fn skip_whitespace(&mut self) {
        while let Some(next) = self.buffer.peek(0) {
            if !is_whitespace(next) {
                break;
            }

            let _ = self.buffer.next_char();
        }
    }

    /// Read the body of a comment, the opening ( has already been consumed.
    fn process_comment(&mut self) -> error::Result<Token> {
        let mut text = String::new();

        loop {
            match self.buffer.next_char() {
                Some(')') => break,
                Some(next) => text.push(next),
                None => {
                    return ScriptError::new_as_result(
                        ErrorKind::UnterminatedComment,
                        Some(self.buffer.location().clone()),
                        "Unexpected end of input in comment.".to_string(),
                        None,
                    );
                }
            }
        }

        Ok(Token::Comment(self.buffer.location().clone(), text))
    }

    /// Read a quoted string, the opening ." pair has not been consumed yet.
    fn process_string(&mut self) -> error::Result<Token> {
        let _ = self.buffer.next_char();
        let _ = self.buffer.next_char();

        let mut text = String::new();

        loop {
            match self.buffer.next_char() {
                Some('"') => break,
                Some(next) => text.push(next),
                None => {
                    return ScriptError::new_as_result(
                        ErrorKind::UnterminatedString,
                        Some(self.buffer.location().clone()),
                        "Unexpected end of input in string literal.".to_string(),
                        None,
                    );
                }
            }
        }

        Ok(Token::QuotedString(self.buffer.location().clone(), text))
    }

    /// Pull text out of the buffer until we hit a whitespace character.  Words can contain any
    /// character except whitespace.
    fn process_until_whitespace(&mut self) -> Token {
        let mut text = String::new();

        while let Some(next) = self.buffer.peek(0) {
            if is_whitespace(next) {
                break;
            }

            text.push(next);
            let _ = self.buffer.next_char();
        }

        let location = self.buffer.location().clone();

        if is_number(&text) {
            // Digit runs too large for a cell fall through to the word path, where they end up
            // reported as unresolved.
            if let Ok(value) = text.parse::<i64>() {
                return Token::IntValue(location, value);
            }
        }

        Token::Word(location, text)
    }

    /// Work out what kind of token starts at the current, non-whitespace, character.
    fn process_token(&mut self, next: char) -> error::Result<Token> {
        match next {
            ':' => {
                let _ = self.buffer.next_char();
                Ok(Token::Colon(self.buffer.location().clone()))
            }

            ';' => {
                let _ = self.buffer.next_char();
                Ok(Token::Semicolon(self.buffer.location().clone()))
            }

            '(' => {
                let _ = self.buffer.next_char();
                self.process_comment()
            }

            ')' => {
                let _ = self.buffer.next_char();
                ScriptError::new_as_result(
                    ErrorKind::UnexpectedToken,
                    Some(self.buffer.location().clone()),
                    "Unexpected ) outside of a comment.".to_string(),
                    None,
                )
            }

            '.' if self.buffer.peek(1) == Some('"') => self.process_string(),

            _ => Ok(self.process_until_whitespace()),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = error::Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();

        let next = self.buffer.peek(0)?;
        let result = self.process_token(next);

        if result.is_err() {
            self.failed = true;
        }

        Some(result)
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenize the whole of the source code up front.
pub fn tokenize_from_source(path: &str, source: &str) -> error::Result<TokenList> {
    Tokenizer::new(path, source).collect()
}
