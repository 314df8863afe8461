use crate::{
    lang::tokenizing::{Token, TokenList, Tokenizer},
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::fmt::{self, Display, Formatter};

/// A top level unit of source code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// A `: name ... ;` word definition.  The tokens exclude the colon and semicolon but start with
    /// the word naming the definition.
    Declaration(TokenList),

    /// Anything else, run until the end of input or the next `:`.
    Expression(TokenList),
}

impl Statement {
    /// All of the tokens of the statement.
    pub fn tokens(&self) -> &TokenList {
        match self {
            Statement::Declaration(tokens) => tokens,
            Statement::Expression(tokens) => tokens,
        }
    }
}

/// Statements print back out in source form.
impl Display for Statement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Statement::Declaration(tokens) => {
                write!(f, ": ")?;

                for token in tokens {
                    write!(f, "{} ", token)?;
                }

                write!(f, ";")
            }

            Statement::Expression(tokens) => {
                for token in tokens {
                    write!(f, "{} ", token)?;
                }

                Ok(())
            }
        }
    }
}

/// Groups the tokenizer's output into statements, one at a time.  Parsing is strictly sequential,
/// control flow bodies are left as flat token runs for the execution engine to deal with.
pub struct StatementParser<'a> {
    tokens: Tokenizer<'a>,

    /// A single token of lookahead, taken from the tokenizer but not yet used.
    peeked: Option<Token>,

    failed: bool,
}

impl<'a> StatementParser<'a> {
    /// Create a parser over the given source text.  The path is only used for locations.
    pub fn new(path: &str, source: &'a str) -> Self {
        StatementParser {
            tokens: Tokenizer::new(path, source),
            peeked: None,
            failed: false,
        }
    }

    /// Look at the next token without consuming it.
    fn peek(&mut self) -> error::Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }

        Ok(self.peeked.as_ref())
    }

    /// Consume the next token.
    fn next_token(&mut self) -> error::Result<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.tokens.next().transpose(),
        }
    }

    /// Parse a definition.  The next token is known to be the opening colon.
    fn parse_declaration(&mut self) -> error::Result<Statement> {
        let colon = self.next_token()?;
        let mut body = TokenList::new();

        loop {
            match self.next_token()? {
                Some(token) if token.is_semicolon() => break,
                Some(token) => body.push(token),
                None => {
                    return ScriptError::new_as_result(
                        ErrorKind::MissingTerminator,
                        colon.map(|token| token.location().clone()),
                        "Missing ';' terminator.".to_string(),
                        None,
                    );
                }
            }
        }

        if body.first().is_some_and(Token::is_word) {
            return Ok(Statement::Declaration(body));
        }

        let location = body
            .first()
            .or(colon.as_ref())
            .map(|token| token.location().clone());

        ScriptError::new_as_result(
            ErrorKind::MissingWordName,
            location,
            "A definition must start with the name of the new word.".to_string(),
            None,
        )
    }

    /// Parse an expression, everything up to the next colon or the end of the input.
    fn parse_expression(&mut self) -> error::Result<Statement> {
        let mut body = TokenList::new();

        while let Some(next) = self.peek()? {
            if next.is_colon() {
                break;
            }

            if let Some(token) = self.next_token()? {
                body.push(token);
            }
        }

        Ok(Statement::Expression(body))
    }

    fn parse_statement(&mut self) -> error::Result<Option<Statement>> {
        let is_declaration = match self.peek()? {
            Some(next) => next.is_colon(),
            None => return Ok(None),
        };

        let statement = if is_declaration {
            self.parse_declaration()?
        } else {
            self.parse_expression()?
        };

        Ok(Some(statement))
    }
}

impl Iterator for StatementParser<'_> {
    type Item = error::Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = self.parse_statement().transpose();

        if let Some(Err(_)) = &result {
            self.failed = true;
        }

        result
    }
}

/// Parse all of the source up front.
pub fn parse_from_source(path: &str, source: &str) -> error::Result<Vec<Statement>> {
    StatementParser::new(path, source).collect()
}

/// Check that the source tokenizes and groups into complete statements without running any of it.
/// Front ends use this to decide whether a multi-line submission is ready to be executed.
pub fn validate(path: &str, source: &str) -> error::Result<()> {
    StatementParser::new(path, source).try_for_each(|statement| statement.map(|_| ()))
}
