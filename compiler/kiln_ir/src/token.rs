//! Tokens produced by the line lexer.

use crate::Span;
use std::fmt;

/// Kind of a lexed token.
///
/// Identifier text is not stored; it is recovered from the source line
/// through the token's span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    Int(i64),
    Str,
    Ident,

    // === Keywords ===
    Fun,
    EndFun,
    Var,
    IntType,
    BoolType,
    While,
    Do,
    EndWhile,
    If,
    Then,
    Else,
    EndIf,
    For,
    EndFor,
    Return,
    Print,
    True,
    False,
    And,
    Or,
    Not,

    // === Punctuation ===
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,

    // === Operators ===
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    /// Bytes the lexer could not recognize (including integer literals
    /// that do not fit in `i64`).
    Error,
}

impl TokenKind {
    /// Reserved words of the toy language.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Fun
                | TokenKind::EndFun
                | TokenKind::Var
                | TokenKind::IntType
                | TokenKind::BoolType
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::EndWhile
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::EndIf
                | TokenKind::For
                | TokenKind::EndFor
                | TokenKind::Return
                | TokenKind::Print
                | TokenKind::True
                | TokenKind::False
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
        )
    }

    /// Assignment and comparison operators.
    ///
    /// These bind looser than any arithmetic operator, so the tokens that
    /// follow one form a self-contained right-hand side.
    pub fn is_introducer(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }

    /// Human-readable name for diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Str => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Fun => "`fun`",
            TokenKind::EndFun => "`endfun`",
            TokenKind::Var => "`var`",
            TokenKind::IntType => "`int`",
            TokenKind::BoolType => "`bool`",
            TokenKind::While => "`while`",
            TokenKind::Do => "`do`",
            TokenKind::EndWhile => "`endwhile`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Else => "`else`",
            TokenKind::EndIf => "`endif`",
            TokenKind::For => "`for`",
            TokenKind::EndFor => "`endfor`",
            TokenKind::Return => "`return`",
            TokenKind::Print => "`print`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Error => "unrecognized input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token with its location in the line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Ordered tokens of one source line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token kinds only, for pattern checks and tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Whether any token failed to lex.
    pub fn has_errors(&self) -> bool {
        self.tokens.iter().any(|t| t.kind == TokenKind::Error)
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
