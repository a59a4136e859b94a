#![allow(clippy::unwrap_used, reason = "tests panic on unexpected lex failures")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> (Vec<TokenKind>, StringInterner) {
    let mut interner = StringInterner::new();
    let tokens = lex(source, &mut interner).unwrap();
    (tokens.kinds().collect(), interner)
}

#[test]
fn lexes_simple_assignment() {
    let (tokens, interner) = kinds("s => s.num = 42");
    let s = interner.get("s").unwrap();
    let num = interner.get("num").unwrap();
    assert_eq!(
        tokens,
        vec![
            TokenKind::Ident(s),
            TokenKind::FatArrow,
            TokenKind::Ident(s),
            TokenKind::Dot,
            TokenKind::Ident(num),
            TokenKind::Eq,
            TokenKind::Number(42.0_f64.to_bits()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn compound_operators_are_single_tokens() {
    let (tokens, _) = kinds("+= -= *= /= %= ++ -- + -");
    assert_eq!(
        tokens,
        vec![
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::PercentEq,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_use_either_quote_and_unescape() {
    let (tokens, interner) = kinds(r#"'it\'s' "a\n\"b\"""#);
    let TokenKind::String(first) = tokens[0] else {
        panic!("expected string, got {:?}", tokens[0]);
    };
    let TokenKind::String(second) = tokens[1] else {
        panic!("expected string, got {:?}", tokens[1]);
    };
    assert_eq!(interner.lookup(first), "it's");
    assert_eq!(interner.lookup(second), "a\n\"b\"");
}

#[test]
fn numbers_decode_to_f64() {
    let (tokens, _) = kinds("3 2.5 .5 1e3 0xff");
    let values: Vec<f64> = tokens
        .iter()
        .filter_map(|k| match k {
            TokenKind::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![3.0, 2.5, 0.5, 1000.0, 255.0]);
}

#[test]
fn keywords_and_dollar_identifiers() {
    let (tokens, interner) = kinds("function return $el _x delete");
    assert_eq!(tokens[0], TokenKind::Function);
    assert_eq!(tokens[1], TokenKind::Return);
    assert_eq!(tokens[2], TokenKind::Ident(interner.get("$el").unwrap()));
    assert_eq!(tokens[3], TokenKind::Ident(interner.get("_x").unwrap()));
    // `delete` is an ordinary identifier; it only matters as a method name.
    assert_eq!(tokens[4], TokenKind::Ident(interner.get("delete").unwrap()));
}

#[test]
fn comments_are_skipped() {
    let (tokens, _) = kinds("// line\n/* block\n * more */ ; /**/");
    assert_eq!(tokens, vec![TokenKind::Semicolon, TokenKind::Eof]);
}

#[test]
fn spans_point_into_source() {
    let source = "s.list[0]";
    let mut interner = StringInterner::new();
    let tokens = lex(source, &mut interner).unwrap();
    let snippets: Vec<&str> = tokens.tokens.iter().map(|t| t.span.snippet(source)).collect();
    assert_eq!(snippets, vec!["s", ".", "list", "[", "0", "]", ""]);
}

#[test]
fn unexpected_character_is_reported() {
    let mut interner = StringInterner::new();
    let err = lex("s => s.a = #", &mut interner).unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            ch: '#',
            span: Span::new(11, 12)
        }
    );
}

#[test]
fn unterminated_string_is_reported() {
    let mut interner = StringInterner::new();
    let err = lex("s => s.a = 'abc", &mut interner).unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedString {
            span: Span::new(11, 15)
        }
    );
}

#[test]
fn unterminated_comment_is_reported() {
    let mut interner = StringInterner::new();
    let err = lex("s /* never closed", &mut interner).unwrap_err();
    assert!(matches!(err, LexError::UnterminatedComment { .. }));
    assert_eq!(err.span().start, 2);
}

proptest! {
    #[test]
    fn never_panics(source in "\\PC{0,64}") {
        let mut interner = StringInterner::new();
        let _ = lex(&source, &mut interner);
    }

    #[test]
    fn successful_lex_ends_with_eof(source in "[a-z0-9 .=;+\\[\\]()'\"]{0,48}") {
        let mut interner = StringInterner::new();
        if let Ok(tokens) = lex(&source, &mut interner) {
            prop_assert_eq!(tokens.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        }
    }
}
