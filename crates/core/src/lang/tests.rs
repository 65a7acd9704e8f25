use std::sync::Arc;

use super::*;
use crate::token::{FileId, TokenKind};

fn images(stream: &crate::token::TokenStream) -> Vec<&str> {
    stream.tokens.iter().map(|t| t.image.as_str()).collect()
}

#[test]
fn clike_tokenizes_statement_with_kinds_and_positions() {
    let lexer = CLikeLexer::new();
    let stream = lexer
        .tokenize("let x = 42;\nreturn \"hi\";\n", FileId(7))
        .unwrap();

    assert_eq!(
        images(&stream),
        vec!["let", "x", "=", "42", ";", "return", "\"hi\"", ";"]
    );

    let kinds: Vec<TokenKind> = stream.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Punct,
            TokenKind::NumberLiteral,
            TokenKind::Punct,
            TokenKind::Keyword,
            TokenKind::StringLiteral,
            TokenKind::Punct,
        ]
    );

    let number = &stream.tokens[3];
    assert_eq!(
        (
            number.begin_line,
            number.begin_column,
            number.end_line,
            number.end_column
        ),
        (1, 9, 1, 10)
    );

    let string = &stream.tokens[6];
    assert_eq!(
        (
            string.begin_line,
            string.begin_column,
            string.end_line,
            string.end_column
        ),
        (2, 8, 2, 11)
    );
    assert_eq!(string.file_id, FileId(7));
}

#[test]
fn clike_skips_comments_and_preprocessor_lines() {
    let lexer = CLikeLexer::new();
    let source = "// line comment\n/* spans\ntwo lines */\n#include <stdio.h>\nfoo\n";
    let stream = lexer.tokenize(source, FileId(0)).unwrap();

    assert_eq!(images(&stream), vec!["foo"]);
    assert_eq!(stream.tokens[0].begin_line, 5);
}

#[test]
fn clike_hash_mid_line_is_punctuation_not_comment() {
    let lexer = CLikeLexer::new();
    let stream = lexer.tokenize("a # b\n", FileId(0)).unwrap();
    assert_eq!(images(&stream), vec!["a", "#", "b"]);
}

#[test]
fn clike_treats_lifetimes_as_punctuation_not_char_literals() {
    let lexer = CLikeLexer::new();
    let stream = lexer
        .tokenize("fn first<'a>(s: &'a str) -> &'a str { s }\n", FileId(0))
        .unwrap();

    let quotes = stream
        .tokens
        .iter()
        .filter(|t| t.image == "'" && t.kind == TokenKind::Punct)
        .count();
    assert_eq!(quotes, 3);
    assert!(
        stream
            .tokens
            .iter()
            .all(|t| t.kind != TokenKind::StringLiteral)
    );

    // real char literals still lex as literals
    let chars = lexer.tokenize("x = 'a'; y = '\\n';\n", FileId(0)).unwrap();
    let literals: Vec<&str> = chars
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLiteral)
        .map(|t| t.image.as_str())
        .collect();
    assert_eq!(literals, vec!["'a'", "'\\n'"]);
}

#[test]
fn clike_reports_unterminated_string() {
    let lexer = CLikeLexer::new();
    let err = lexer.tokenize("ok();\nbad = \"oops\n", FileId(3)).unwrap_err();
    assert_eq!(err.file_id, FileId(3));
    assert_eq!((err.line, err.column), (2, 7));
    assert!(err.message.contains("unterminated"));
}

#[test]
fn clike_reports_unterminated_block_comment() {
    let lexer = CLikeLexer::new();
    let err = lexer.tokenize("x /* never closed", FileId(1)).unwrap_err();
    assert_eq!((err.line, err.column), (1, 3));
    assert!(err.message.contains("unterminated"));
}

#[test]
fn clike_is_deterministic_with_increasing_positions() {
    let lexer = CLikeLexer::new();
    let source = "fn main() {\n    let total = a + 100;\n    print(\"x\\\"y\", total);\n}\n";

    let first = lexer.tokenize(source, FileId(0)).unwrap();
    let second = lexer.tokenize(source, FileId(0)).unwrap();
    assert_eq!(first.tokens, second.tokens);

    for pair in first.tokens.windows(2) {
        assert!(
            (pair[0].begin_line, pair[0].begin_column) < (pair[1].begin_line, pair[1].begin_column)
        );
    }
}

#[test]
fn plain_text_splits_words_with_positions() {
    let stream = PlainTextLexer
        .tokenize("alpha 42\n  beta\n", FileId(2))
        .unwrap();

    assert_eq!(images(&stream), vec!["alpha", "42", "beta"]);
    assert_eq!(stream.tokens[0].kind, TokenKind::Identifier);
    assert_eq!(stream.tokens[1].kind, TokenKind::NumberLiteral);

    let beta = &stream.tokens[2];
    assert_eq!(
        (
            beta.begin_line,
            beta.begin_column,
            beta.end_line,
            beta.end_column
        ),
        (2, 3, 2, 6)
    );
}

#[test]
fn registry_resolves_builtin_languages() {
    let registry = LanguageRegistry::with_builtin_languages();
    assert!(registry.resolve("java", None).is_some());
    assert!(registry.resolve("text", None).is_some());
    assert!(registry.resolve("cobol", None).is_none());
}

#[test]
fn registry_falls_back_from_version_to_versionless() {
    let mut registry = LanguageRegistry::with_builtin_languages();
    let custom: Arc<dyn Lexer> = Arc::new(PlainTextLexer);
    registry.register("java", Some("17"), Arc::clone(&custom));

    let exact = registry.resolve("java", Some("17")).unwrap();
    assert!(Arc::ptr_eq(&exact, &custom));

    // unknown version falls back to the versionless entry
    let fallback = registry.resolve("java", Some("99")).unwrap();
    assert!(!Arc::ptr_eq(&fallback, &custom));

    assert!(registry.resolve("cobol", Some("85")).is_none());
}

#[test]
fn registry_lists_sorted_language_ids() {
    let ids = LanguageRegistry::with_builtin_languages().language_ids();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert!(ids.contains(&"c".to_string()));
    assert!(ids.contains(&"text".to_string()));
}
