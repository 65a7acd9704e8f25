use std::iter::Peekable;
use std::str::Chars;

use crate::error::LexError;
use crate::token::{FileId, Token, TokenKind, TokenStream};

use super::Lexer;

/// Approximate lexer for brace-family languages (C, C++, Java, JavaScript,
/// Go, Rust, C#). Understands line/block comments, `#` preprocessor lines,
/// string and char literals with escapes, numbers, identifiers/keywords and
/// single-character punctuation. Good enough for token-identity duplicate
/// detection; not a real grammar.
#[derive(Debug, Default)]
pub struct CLikeLexer {
    _private: (),
}

impl CLikeLexer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_keyword(ident: &str) -> bool {
    matches!(
        ident,
        "if" | "else"
            | "for"
            | "while"
            | "do"
            | "switch"
            | "case"
            | "break"
            | "continue"
            | "return"
            | "try"
            | "catch"
            | "finally"
            | "throw"
            | "fn"
            | "function"
            | "class"
            | "struct"
            | "enum"
            | "impl"
            | "trait"
            | "interface"
            | "const"
            | "let"
            | "var"
            | "static"
            | "void"
            | "new"
            | "public"
            | "private"
            | "protected"
            | "async"
            | "await"
            | "match"
            | "use"
            | "import"
            | "package"
            | "namespace"
    )
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
    // position of the most recently consumed char
    last_line: u32,
    last_column: u32,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
            last_line: 1,
            last_column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn peek_third(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next();
        ahead.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.last_line = self.line;
        self.last_column = self.column;
        if ch == '\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
        Some(ch)
    }
}

impl Lexer for CLikeLexer {
    fn tokenize(&self, text: &str, file_id: FileId) -> Result<TokenStream, LexError> {
        let mut cursor = Cursor::new(text);
        let mut stream = TokenStream::new(file_id);
        let mut at_line_start = true;

        while let Some(ch) = cursor.peek() {
            if ch == '\n' {
                cursor.bump();
                at_line_start = true;
                continue;
            }
            if ch.is_whitespace() {
                cursor.bump();
                continue;
            }

            let begin_line = cursor.line;
            let begin_column = cursor.column;
            let was_at_line_start = at_line_start;
            at_line_start = false;

            // line comment
            if ch == '/' && cursor.peek_second() == Some('/') {
                while let Some(c) = cursor.peek() {
                    if c == '\n' {
                        break;
                    }
                    cursor.bump();
                }
                continue;
            }

            // block comment
            if ch == '/' && cursor.peek_second() == Some('*') {
                cursor.bump();
                cursor.bump();
                let mut closed = false;
                while let Some(c) = cursor.bump() {
                    if c == '*' && cursor.peek() == Some('/') {
                        cursor.bump();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(LexError::new(
                        file_id,
                        begin_line,
                        begin_column,
                        "unterminated block comment",
                    ));
                }
                continue;
            }

            // preprocessor / shell-style line, only when nothing else came first
            if ch == '#' && was_at_line_start {
                while let Some(c) = cursor.peek() {
                    if c == '\n' {
                        break;
                    }
                    cursor.bump();
                }
                continue;
            }

            // `'` opening a lifetime (`'a`, `'static`) rather than a char
            // literal: an identifier char follows and the quote does not
            // close right after it
            if ch == '\''
                && cursor
                    .peek_second()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
                && cursor.peek_third() != Some('\'')
            {
                cursor.bump();
                stream.push(Token::new(
                    TokenKind::Punct,
                    "'",
                    file_id,
                    begin_line,
                    begin_column,
                    cursor.last_line,
                    cursor.last_column,
                ));
                continue;
            }

            if ch == '"' || ch == '\'' {
                let quote = ch;
                let mut image = String::new();
                image.push(cursor.bump().unwrap_or(quote));
                let mut closed = false;
                while let Some(c) = cursor.bump() {
                    image.push(c);
                    if c == '\\' {
                        if let Some(escaped) = cursor.bump() {
                            image.push(escaped);
                        }
                        continue;
                    }
                    if c == quote {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(LexError::new(
                        file_id,
                        begin_line,
                        begin_column,
                        format!("unterminated {quote} literal"),
                    ));
                }
                stream.push(Token::new(
                    TokenKind::StringLiteral,
                    image,
                    file_id,
                    begin_line,
                    begin_column,
                    cursor.last_line,
                    cursor.last_column,
                ));
                continue;
            }

            if ch.is_alphabetic() || ch == '_' {
                let mut image = String::new();
                while let Some(c) = cursor.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        image.push(c);
                        cursor.bump();
                    } else {
                        break;
                    }
                }
                let kind = if is_keyword(&image) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                stream.push(Token::new(
                    kind,
                    image,
                    file_id,
                    begin_line,
                    begin_column,
                    cursor.last_line,
                    cursor.last_column,
                ));
                continue;
            }

            if ch.is_ascii_digit() {
                let mut image = String::new();
                while let Some(c) = cursor.peek() {
                    // swallows radix prefixes, digit separators and suffixes
                    if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                        image.push(c);
                        cursor.bump();
                    } else {
                        break;
                    }
                }
                stream.push(Token::new(
                    TokenKind::NumberLiteral,
                    image,
                    file_id,
                    begin_line,
                    begin_column,
                    cursor.last_line,
                    cursor.last_column,
                ));
                continue;
            }

            // single-char punctuation; multi-char operators stay unfused,
            // which is harmless for token-identity comparison
            let c = match cursor.bump() {
                Some(c) => c,
                None => break,
            };
            stream.push(Token::new(
                TokenKind::Punct,
                c.to_string(),
                file_id,
                begin_line,
                begin_column,
                cursor.last_line,
                cursor.last_column,
            ));
        }

        Ok(stream)
    }
}
