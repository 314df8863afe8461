use crate::lang::tokenizing::{Token, TokenList};
use std::rc::Rc;

/// A forward only, peekable cursor over a shared list of tokens.  The execution engine drives one
/// of these for every token list it runs, and structured control words pull their bodies straight
/// out of the same cursor.
///
/// The token list itself is shared, so stepping through a user word's body never copies the body.
#[derive(Clone)]
pub struct TokenStream {
    tokens: Rc<TokenList>,
    position: usize,
}

impl TokenStream {
    /// Create a new stream positioned at the first token.
    pub fn new(tokens: Rc<TokenList>) -> TokenStream {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    /// Look at a token `lookahead` places past the cursor without consuming anything.
    pub fn peek(&self, lookahead: usize) -> Option<&Token> {
        self.tokens.get(self.position + lookahead)
    }

    /// How many tokens are left to consume.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();

        if token.is_some() {
            self.position += 1;
        }

        token
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for TokenStream {}
