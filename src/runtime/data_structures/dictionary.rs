use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::TokenList},
    runtime::interpreter::WordHandler,
};
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// What actually runs when a word is invoked.
#[derive(Clone)]
pub enum WordOperation {
    /// The word is a native word written in Rust.
    Builtin(Rc<WordHandler>),

    /// The word was defined with `: name ... ;`.  The body is fixed at definition time and is
    /// executed verbatim on every invocation.
    UserDefined(Rc<TokenList>),
}

impl WordOperation {
    pub fn is_builtin(&self) -> bool {
        matches!(self, WordOperation::Builtin(_))
    }
}

/// The information stored in the dictionary for each word.
#[derive(Clone)]
pub struct WordInfo {
    /// The location in the source code where the word was defined.
    pub location: SourceLocation,

    /// The name of the word.
    pub name: String,

    /// A simple description of the word.
    pub description: String,

    /// The stack signature of the word.
    pub signature: String,

    /// The word's behaviour.
    pub operation: WordOperation,
}

impl WordInfo {
    /// Create a new WordInfo with an empty description and signature.
    pub fn new(location: SourceLocation, name: String, operation: WordOperation) -> WordInfo {
        WordInfo {
            location,
            name,
            description: String::new(),
            signature: String::new(),
            operation,
        }
    }
}

/// A word renders the way it would be defined, builtins show a placeholder instead of a body.
impl Display for WordInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, ": {}   ", self.name)?;

        match &self.operation {
            WordOperation::Builtin(_) => write!(f, "<builtin> ")?,
            WordOperation::UserDefined(body) => {
                for token in body.iter() {
                    write!(f, "{} ", token)?;
                }
            }
        }

        write!(f, ";")
    }
}

/// The dictionary used by the interpreter.  It is an ordered list of bindings, lookups always
/// search from the newest binding backwards.  So redefining a word shadows the old definition
/// rather than replacing it.
///
/// Forgetting a word truncates the list at the word's newest binding.  Everything defined after
/// it goes as well, whether it is related to the word or not.
#[derive(Clone, Default)]
pub struct Dictionary {
    words: Vec<WordInfo>,
}

/// Pretty print the dictionary.  Shadowed words are listed only once, under their newest
/// definition.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let visible: Vec<&WordInfo> = self
            .words
            .iter()
            .enumerate()
            .filter(|(index, word)| self.find(&word.name) == Some(*index))
            .map(|(_, word)| word)
            .collect();

        let max_size = visible.iter().map(|word| word.name.len()).max().unwrap_or(0);

        writeln!(formatter, "{} words defined.\n", visible.len())?;

        for word in visible {
            let kind = if word.operation.is_builtin() {
                "builtin"
            } else {
                "user"
            };

            writeln!(
                formatter,
                "{:width$}  {:7}  {:16}  --  {}",
                word.name,
                kind,
                word.signature,
                word.description,
                width = max_size
            )?;
        }

        Ok(())
    }
}

impl Dictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Dictionary {
        Dictionary { words: Vec::new() }
    }

    /// Append a new binding.  An existing binding of the same name is shadowed, not replaced.
    pub fn add(&mut self, info: WordInfo) {
        self.words.push(info);
    }

    /// Get the newest binding for the name.
    pub fn get(&self, name: &str) -> Option<&WordInfo> {
        self.words.iter().rev().find(|word| word.name == name)
    }

    /// Find the position of the newest binding for the name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.words.iter().rposition(|word| word.name == name)
    }

    /// Remove the newest binding of the name along with every binding added after it.  The removed
    /// bindings are returned in definition order, or None if the name isn't bound at all.
    pub fn forget(&mut self, name: &str) -> Option<Vec<WordInfo>> {
        let index = self.find(name)?;

        Some(self.words.split_off(index))
    }

    /// All of the bindings in definition order, shadowed ones included.
    pub fn list(&self) -> &[WordInfo] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
