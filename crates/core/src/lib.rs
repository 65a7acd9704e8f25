mod corpus;
mod detect;
mod error;
mod filter;
mod lang;
mod pipeline;
mod report;
mod token;
mod types;
mod util;

pub use corpus::{Corpus, SourceEntry};

pub use error::{Error, LexError};

pub use lang::{CLikeLexer, LanguageRegistry, Lexer, PlainTextLexer};

pub use pipeline::{detect_duplicates, detect_duplicates_with_cancel};

pub use token::{FileId, Token, TokenKind, TokenStream};

pub use types::{
    CancelFlag, DetectionOptions, DiagnosticKind, FileDiagnostic, Finding, FindingOccurrence,
    RunOutcome, RunStats,
};
