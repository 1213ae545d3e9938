//! Precedence-climbing parser over `lexer` tokens.
//!
//! ```text
//! expression    := biconditional
//! biconditional := implication ( "<=>" biconditional )?
//! implication   := disjunction ( "=>" implication )?
//! disjunction   := conjunction ( "||" conjunction )*
//! conjunction   := unary ( "&" unary )*
//! unary         := "~" unary | primary
//! primary       := ATOM | "(" expression ")"
//! ```

use crate::error::{Location, SyntaxError, SyntaxErrorKind};
use crate::expr::Expr;
use crate::lexer::{tokenize, Token, TokenKind};

/// How deeply parentheses, negations and right-nested `=>`/`<=>` may nest.
/// Each level is a parser call frame.
pub const MAX_NESTING: usize = 128;

/// Tallest expression tree the parser builds. Long `&`/`||` chains grow
/// the tree without growing the parser's own stack, so they are bounded
/// separately; evaluation and rendering recurse to this height.
pub const MAX_HEIGHT: usize = 1024;

/// Parse one KB clause.
pub fn parse_clause(text: &str) -> Result<Expr, SyntaxError> {
    parse_expression(text)
}

/// Parse the ASK expression.
pub fn parse_query(text: &str) -> Result<Expr, SyntaxError> {
    parse_expression(text).map_err(|err| err.at(Location::Query))
}

fn parse_expression(text: &str) -> Result<Expr, SyntaxError> {
    let text = text.trim();
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(SyntaxError::new(text, 0, SyntaxErrorKind::EmptyExpression));
    }

    let mut parser = Parser {
        text,
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let node = parser.expression()?;

    match parser.peek() {
        None => Ok(node.expr),
        Some(tok) if tok.kind == TokenKind::RParen => {
            Err(parser.error(tok.offset, SyntaxErrorKind::UnmatchedParen))
        }
        Some(tok) => Err(parser.error(
            tok.offset,
            SyntaxErrorKind::UnexpectedToken {
                found: tok.lexeme.to_string(),
            },
        )),
    }
}

/// A parsed subtree with its height (an atom has height 1).
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Node { expr, height: 1 }
    }
}

struct Parser<'t, 'a> {
    text: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn previous(&self) -> Option<Token<'a>> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i).copied())
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                Some(tok)
            }
            _ => None,
        }
    }

    fn end_offset(&self) -> usize {
        self.text.chars().count()
    }

    fn error(&self, offset: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.text, offset, kind)
    }

    /// Run `parse` one nesting level deeper, refusing to pass `MAX_NESTING`.
    fn nested(
        &mut self,
        offset: usize,
        parse: impl FnOnce(&mut Self) -> Result<Node, SyntaxError>,
    ) -> Result<Node, SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                offset,
                SyntaxErrorKind::NestingTooDeep { limit: MAX_NESTING },
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn taller(&self, offset: usize, height: usize) -> Result<usize, SyntaxError> {
        if height >= MAX_HEIGHT {
            Err(self.error(
                offset,
                SyntaxErrorKind::NestingTooDeep { limit: MAX_HEIGHT },
            ))
        } else {
            Ok(height + 1)
        }
    }

    fn join(
        &self,
        op: Token<'a>,
        left: Node,
        right: Node,
        build: fn(Expr, Expr) -> Expr,
    ) -> Result<Node, SyntaxError> {
        let height = self.taller(op.offset, left.height.max(right.height))?;
        Ok(Node {
            expr: build(left.expr, right.expr),
            height,
        })
    }

    fn expression(&mut self) -> Result<Node, SyntaxError> {
        self.biconditional()
    }

    // Right-associative: a <=> b <=> c = a <=> (b <=> c)
    fn biconditional(&mut self) -> Result<Node, SyntaxError> {
        let left = self.implication()?;
        let Some(op) = self.eat(TokenKind::Iff) else {
            return Ok(left);
        };
        let right = self.nested(op.offset, Self::biconditional)?;
        self.join(op, left, right, Expr::iff)
    }

    // Right-associative: a => b => c = a => (b => c)
    fn implication(&mut self) -> Result<Node, SyntaxError> {
        let left = self.disjunction()?;
        let Some(op) = self.eat(TokenKind::Implies) else {
            return Ok(left);
        };
        let right = self.nested(op.offset, Self::implication)?;
        self.join(op, left, right, Expr::implies)
    }

    fn disjunction(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.conjunction()?;
        while let Some(op) = self.eat(TokenKind::Or) {
            let right = self.conjunction()?;
            left = self.join(op, left, right, Expr::or)?;
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.unary()?;
        while let Some(op) = self.eat(TokenKind::And) {
            let right = self.unary()?;
            left = self.join(op, left, right, Expr::and)?;
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Node, SyntaxError> {
        let Some(op) = self.eat(TokenKind::Not) else {
            return self.primary();
        };
        let inner = self.nested(op.offset, Self::unary)?;
        let height = self.taller(op.offset, inner.height)?;
        Ok(Node {
            expr: Expr::not(inner.expr),
            height,
        })
    }

    fn primary(&mut self) -> Result<Node, SyntaxError> {
        if let Some(tok) = self.eat(TokenKind::Atom) {
            return Ok(Node::leaf(Expr::atom(tok.lexeme)));
        }

        if let Some(open) = self.eat(TokenKind::LParen) {
            let inner = self.nested(open.offset, Self::expression)?;
            return match self.peek() {
                Some(tok) if tok.kind == TokenKind::RParen => {
                    self.pos += 1;
                    Ok(inner)
                }
                None => Err(self.error(open.offset, SyntaxErrorKind::UnclosedParen)),
                Some(tok) => Err(self.error(
                    tok.offset,
                    SyntaxErrorKind::UnexpectedToken {
                        found: tok.lexeme.to_string(),
                    },
                )),
            };
        }

        Err(self.missing_operand())
    }

    /// Diagnose a position where an operand was required but none is present.
    fn missing_operand(&self) -> SyntaxError {
        match (self.previous(), self.peek()) {
            (Some(prev), _) if prev.kind.is_operator() => self.error(
                prev.offset,
                SyntaxErrorKind::MissingOperand {
                    operator: prev.lexeme.to_string(),
                },
            ),
            (Some(prev), Some(next))
                if prev.kind == TokenKind::LParen && next.kind == TokenKind::RParen =>
            {
                self.error(prev.offset, SyntaxErrorKind::EmptyParens)
            }
            (Some(prev), None) if prev.kind == TokenKind::LParen => {
                self.error(prev.offset, SyntaxErrorKind::UnclosedParen)
            }
            (_, Some(next)) if next.kind.is_binary_operator() => self.error(
                next.offset,
                SyntaxErrorKind::MissingOperand {
                    operator: next.lexeme.to_string(),
                },
            ),
            (_, Some(next)) if next.kind == TokenKind::RParen => {
                self.error(next.offset, SyntaxErrorKind::UnmatchedParen)
            }
            (_, Some(next)) => self.error(
                next.offset,
                SyntaxErrorKind::UnexpectedToken {
                    found: next.lexeme.to_string(),
                },
            ),
            (_, None) => self.error(self.end_offset(), SyntaxErrorKind::EmptyExpression),
        }
    }
}
