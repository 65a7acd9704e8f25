use crate::error::LexError;
use crate::token::{FileId, Token, TokenKind, TokenStream};

use super::Lexer;

/// Whitespace-separated words, one token each. Registered as `text`; also a
/// convenient deterministic fixture for tests. Words of pure ASCII digits
/// count as number literals so normalization has something to collapse.
#[derive(Debug, Default)]
pub struct PlainTextLexer;

impl Lexer for PlainTextLexer {
    fn tokenize(&self, text: &str, file_id: FileId) -> Result<TokenStream, LexError> {
        let mut stream = TokenStream::new(file_id);

        for (line_idx, line) in text.lines().enumerate() {
            let line_no = u32::try_from(line_idx)
                .ok()
                .and_then(|n| n.checked_add(1))
                .unwrap_or(u32::MAX);

            let mut column = 0u32;
            let mut word = String::new();
            let mut word_begin = 0u32;

            for ch in line.chars().chain(Some('\n')) {
                column = column.saturating_add(1);
                if ch.is_whitespace() {
                    if !word.is_empty() {
                        let kind = if word.bytes().all(|b| b.is_ascii_digit()) {
                            TokenKind::NumberLiteral
                        } else {
                            TokenKind::Identifier
                        };
                        let end_column = column - 1;
                        stream.push(Token::new(
                            kind,
                            std::mem::take(&mut word),
                            file_id,
                            line_no,
                            word_begin,
                            line_no,
                            end_column,
                        ));
                    }
                    continue;
                }
                if word.is_empty() {
                    word_begin = column;
                }
                word.push(ch);
            }
        }

        Ok(stream)
    }
}
