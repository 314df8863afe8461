use crate::{
    lang::{
        source_buffer::SourceLocation,
        tokenizing::{Token, TokenList},
    },
    runtime::error::{self, ErrorKind, ScriptError},
};

/// The vocabulary of one structured control word.  Blocks of the same kind may nest, a nested
/// opener hides everything up to its matching closer from the outer scan.
#[derive(Clone, Copy, Debug)]
pub struct BlockScanner {
    /// The keyword that opens the block.  It has already been consumed when scanning starts.
    pub opener: &'static str,

    /// Any of these ends the block.
    pub closers: &'static [&'static str],

    /// Markers that split the block into segments, only recognized outside of nested blocks.
    pub separators: &'static [&'static str],
}

/// The tokens pulled out of a block.
#[derive(Clone, Debug)]
pub struct ScannedBlock {
    /// The tokens between the opener, the separators and the closer.  There is always one more
    /// segment than there are separators.
    pub segments: Vec<TokenList>,

    /// The separator tokens that were found, in order.
    pub separators: Vec<Token>,

    /// The token that ended the block.
    pub closer: Token,
}

impl ScannedBlock {
    /// The keyword that ended the block.
    pub fn closer_name(&self) -> &str {
        self.closer.word().unwrap_or_default()
    }
}

impl BlockScanner {
    /// Pull a block's tokens out of the stream, stopping after the block's own closer.  The opener's
    /// location is used to report a block that is never closed.
    pub fn scan<I>(&self, tokens: &mut I, location: &SourceLocation) -> error::Result<ScannedBlock>
    where
        I: Iterator<Item = Token>,
    {
        let mut segments = Vec::new();
        let mut separators = Vec::new();
        let mut current = TokenList::new();

        // The openers of the nested blocks we are currently inside of.
        let mut nested: Vec<SourceLocation> = Vec::new();

        for token in tokens.by_ref() {
            let Some(word) = token.word() else {
                current.push(token);
                continue;
            };

            if word == self.opener {
                nested.push(token.location().clone());
                current.push(token);
            } else if self.closers.iter().any(|closer| *closer == word) {
                if nested.pop().is_none() {
                    segments.push(current);

                    return Ok(ScannedBlock {
                        segments,
                        separators,
                        closer: token,
                    });
                }

                current.push(token);
            } else if nested.is_empty() && self.separators.iter().any(|marker| *marker == word) {
                segments.push(std::mem::take(&mut current));
                separators.push(token);
            } else {
                current.push(token);
            }
        }

        ScriptError::new_as_result(
            ErrorKind::UnterminatedBlock,
            Some(location.clone()),
            format!(
                "Unterminated {} block, expected one of {}.",
                self.opener,
                self.closers.join(", ")
            ),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenizing::tokenize_from_source;

    const IF_SCANNER: BlockScanner = BlockScanner {
        opener: "IF",
        closers: &["THEN"],
        separators: &["ELSE"],
    };

    fn words(tokens: &TokenList) -> Vec<String> {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    fn scan(scanner: &BlockScanner, source: &str) -> error::Result<(ScannedBlock, Vec<Token>)> {
        let mut tokens = tokenize_from_source("<test>", source)?.into_iter();
        let block = scanner.scan(&mut tokens, &SourceLocation::new())?;

        Ok((block, tokens.collect()))
    }

    #[test]
    fn stops_after_the_closer() {
        let (block, rest) = scan(&IF_SCANNER, "1 2 THEN 3").unwrap();

        assert_eq!(block.segments.len(), 1);
        assert_eq!(words(&block.segments[0]), vec!["1", "2"]);
        assert_eq!(block.closer_name(), "THEN");
        assert_eq!(words(&rest), vec!["3"]);
    }

    #[test]
    fn nested_blocks_are_kept_whole() {
        let (block, rest) = scan(&IF_SCANNER, "A IF B ELSE C THEN ELSE D THEN E").unwrap();

        assert_eq!(block.separators.len(), 1);
        assert_eq!(
            words(&block.segments[0]),
            vec!["A", "IF", "B", "ELSE", "C", "THEN"]
        );
        assert_eq!(words(&block.segments[1]), vec!["D"]);
        assert_eq!(words(&rest), vec!["E"]);
    }

    #[test]
    fn any_closer_ends_the_block() {
        let scanner = BlockScanner {
            opener: "BEGIN",
            closers: &["UNTIL", "AGAIN", "REPEAT"],
            separators: &["WHILE"],
        };

        let (block, _) = scan(&scanner, "BEGIN X AGAIN Y WHILE Z REPEAT").unwrap();

        assert_eq!(block.closer_name(), "REPEAT");
        assert_eq!(words(&block.segments[0]), vec!["BEGIN", "X", "AGAIN", "Y"]);
        assert_eq!(words(&block.segments[1]), vec!["Z"]);
    }

    #[test]
    fn missing_closer_is_reported() {
        let error = scan(&IF_SCANNER, "1 IF 2 THEN").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnterminatedBlock);
        assert!(error.error().contains("IF"));
    }
}
