//! Kiln Lexer - tokenizer for single lines of toy-language source.
//!
//! The optimizer never needs a whole-file token stream: every decision it
//! makes is local to one line. [`lex`] turns a line into a `TokenList`
//! whose spans are offsets into that line, and [`LineFlags`] summarizes the
//! structural markers the hoisting state machine reacts to.

mod line;
mod raw_token;

pub use line::{classify, LineFlags, LineKind};

use kiln_ir::{Span, Token, TokenKind, TokenList};
use logos::Logos;
use raw_token::RawToken;

/// Lex one line of source into tokens.
///
/// Unrecognized input becomes `TokenKind::Error` rather than aborting, so
/// callers can still classify the rest of the line.
pub fn lex(source: &str) -> TokenList {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let kind = match token_result {
            Ok(raw) => convert_token(raw),
            Err(()) => TokenKind::Error,
        };
        result.push(Token::new(kind, span));
    }

    result
}

fn convert_token(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Str => TokenKind::Str,
        RawToken::Ident => TokenKind::Ident,

        // Keywords
        RawToken::Fun => TokenKind::Fun,
        RawToken::EndFun => TokenKind::EndFun,
        RawToken::Var => TokenKind::Var,
        RawToken::IntType => TokenKind::IntType,
        RawToken::BoolType => TokenKind::BoolType,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::EndWhile => TokenKind::EndWhile,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::EndIf => TokenKind::EndIf,
        RawToken::For => TokenKind::For,
        RawToken::EndFor => TokenKind::EndFor,
        RawToken::Return => TokenKind::Return,
        RawToken::Print => TokenKind::Print,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,

        // Symbols
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,

        // Operators
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
    }
}
