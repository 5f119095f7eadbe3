//! Recursive-descent expression parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr           = multiplicative (("+" | "-") multiplicative)*
//! multiplicative = unary (("*" | "/") unary)*
//! unary          = "-" unary | primary
//! primary        = INT | IDENT | IDENT "(" [expr ("," expr)*] ")" | "(" expr ")"
//! ```
//!
//! Identifiers are accepted so that the folding pass can find constant
//! sub-expressions inside larger runtime expressions; the evaluator decides
//! what is constant.

use kiln_ir::{BinaryOp, CallArgs, Expr, ExprArena, ExprId, ExprKind, Token, TokenKind, UnaryOp};
use kiln_stack::{ensure_sufficient_stack, NestingDepth};
use tracing::trace;

use crate::ParseError;

/// A parsed expression and the arena holding its nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedExpr {
    pub arena: ExprArena,
    pub root: ExprId,
}

/// Parse `tokens` (lexed from `source`) as exactly one expression.
///
/// Every token must be consumed; leftover tokens are an error rather than
/// being silently ignored.
pub fn parse_expression(source: &str, tokens: &[Token]) -> Result<ParsedExpr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser::new(source, tokens);
    let root = parser.parse_expr()?;

    if let Some(extra) = parser.current() {
        trace!(found = ?extra.kind, "trailing tokens after expression");
        return Err(ParseError::TrailingTokens {
            found: extra.kind,
            span: extra.span,
        });
    }

    Ok(ParsedExpr {
        arena: parser.arena,
        root,
    })
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    arena: ExprArena,
    depth: NestingDepth,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            arena: ExprArena::new(),
            depth: NestingDepth::new(),
        }
    }

    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consume a token of `kind` or fail.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.advance();
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                found: token.kind,
                span: token.span,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    /// Run `f` one nesting level deeper, growing the stack if needed.
    fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, ParseError>,
    ) -> Result<R, ParseError> {
        self.depth.descend()?;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth.ascend();
        result
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind()? {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind()? {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.arena.span(left).merge(self.arena.span(right));
        self.arena
            .alloc(Expr::new(ExprKind::Binary { op, left, right }, span))
    }

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;

        while let Some(op) = self.match_additive_op() {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.match_multiplicative_op() {
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        match self.current() {
            Some(token) if token.kind == TokenKind::Minus => {
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                let span = token.span.merge(self.arena.span(operand));
                Ok(self.arena.alloc(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        operand,
                    },
                    span,
                )))
            }
            Some(token) if token.kind == TokenKind::Plus => {
                Err(ParseError::UnaryPlus { span: token.span })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let Some(token) = self.current() else {
            return Err(ParseError::UnexpectedEnd {
                expected: "an operand",
            });
        };

        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.arena.alloc(Expr::new(ExprKind::Int(value), token.span)))
            }
            TokenKind::Ident => {
                self.advance();
                let name = token.span.slice(self.source).to_string();
                if self.check(TokenKind::LParen) {
                    self.parse_call(name, token)
                } else {
                    Ok(self.arena.alloc(Expr::new(ExprKind::Ident(name), token.span)))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.nested(Self::parse_expr)?;
                let close = self.expect(TokenKind::RParen, "`)`")?;
                self.arena.set_span(inner, token.span.merge(close.span));
                Ok(inner)
            }
            found => Err(ParseError::UnexpectedToken {
                found,
                span: token.span,
            }),
        }
    }

    /// Parse `name(arg, ...)`; the current token is the opening parenthesis.
    fn parse_call(&mut self, callee: String, name_token: Token) -> Result<ExprId, ParseError> {
        self.advance();
        let mut args = CallArgs::new();

        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.nested(Self::parse_expr)?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.expect(TokenKind::RParen, "`)` after call arguments")?;
        let span = name_token.span.merge(close.span);
        Ok(self
            .arena
            .alloc(Expr::new(ExprKind::Call { callee, args }, span)))
    }
}
