use std::fmt;

/// Opaque, caller-assigned file identity. Stable for one run; assigned in
/// input order by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Coarse token tag shared by every language front-end. Per-language detail
/// (which keyword, which operator) lives in the token image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    NumberLiteral,
    StringLiteral,
    Punct,
    Other,
}

pub(crate) const NORM_IDENTIFIER: &str = "<id>";
pub(crate) const NORM_NUMBER: &str = "<num>";
pub(crate) const NORM_STRING: &str = "<str>";

/// One lexical unit. Immutable once produced; `norm_image` starts out equal
/// to `image` and is only rewritten by the corpus assembler's normalization
/// pass. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    pub norm_image: String,
    pub file_id: FileId,
    pub begin_line: u32,
    pub begin_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        image: impl Into<String>,
        file_id: FileId,
        begin_line: u32,
        begin_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        let image = image.into();
        let norm_image = image.clone();
        Self {
            kind,
            image,
            norm_image,
            file_id,
            begin_line,
            begin_column,
            end_line,
            end_column,
        }
    }
}

/// Ordered tokens of one file, as produced by a lexer.
#[derive(Debug)]
pub struct TokenStream {
    pub file_id: FileId,
    pub tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(file_id: FileId) -> Self {
        Self {
            file_id,
            tokens: Vec::new(),
        }
    }

    /// Appends a token. Lexers must push in document order with strictly
    /// increasing begin positions; debug builds check the contract.
    pub fn push(&mut self, token: Token) {
        debug_assert!(
            self.tokens.last().is_none_or(|prev| {
                (prev.begin_line, prev.begin_column) < (token.begin_line, token.begin_column)
            }),
            "token positions must be strictly increasing"
        );
        debug_assert!(!token.image.is_empty(), "zero-length token");
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Collapses literal/identifier images to fixed placeholders so occurrences
/// differing only in those lexemes compare equal. Raw images and positions
/// are untouched.
pub(crate) fn normalize_stream(
    stream: &mut TokenStream,
    ignore_literals: bool,
    ignore_identifiers: bool,
) {
    if !ignore_literals && !ignore_identifiers {
        return;
    }
    for token in &mut stream.tokens {
        match token.kind {
            TokenKind::NumberLiteral if ignore_literals => {
                token.norm_image = NORM_NUMBER.to_string();
            }
            TokenKind::StringLiteral if ignore_literals => {
                token.norm_image = NORM_STRING.to_string();
            }
            TokenKind::Identifier if ignore_identifiers => {
                token.norm_image = NORM_IDENTIFIER.to_string();
            }
            _ => {}
        }
    }
}
