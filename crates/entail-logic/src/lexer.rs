//! Clause tokenizer.
//!
//! Every operator has several accepted spellings; they all collapse to the
//! same `TokenKind`, so the parser only ever sees five connectives.
//!
//! | connective | spellings          |
//! |------------|--------------------|
//! | NOT        | `~` `¬` `!`        |
//! | AND        | `&` `&&` `∧`       |
//! | OR         | `\|\|` `\|` `∨`    |
//! | IMPLIES    | `=>` `->` `→`      |
//! | IFF        | `<=>` `<->` `↔`    |

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::{map, value},
    IResult,
};

use crate::error::{SyntaxError, SyntaxErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Atom,
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
}

impl TokenKind {
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::And | TokenKind::Or | TokenKind::Implies | TokenKind::Iff
        )
    }

    pub fn is_operator(self) -> bool {
        self == TokenKind::Not || self.is_binary_operator()
    }
}

/// A token together with its source spelling and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub offset: usize,
}

pub(crate) fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn operator(input: &str) -> IResult<&str, TokenKind> {
    // Longest spellings first: `<=>` before `=>`, `||` before `|`, `&&` before `&`.
    alt((
        value(TokenKind::Iff, alt((tag("<=>"), tag("<->"), tag("↔")))),
        value(TokenKind::Implies, alt((tag("=>"), tag("->"), tag("→")))),
        value(TokenKind::Or, alt((tag("||"), tag("|"), tag("∨")))),
        value(TokenKind::And, alt((tag("&&"), tag("&"), tag("∧")))),
        value(TokenKind::Not, alt((tag("~"), tag("¬"), tag("!")))),
        value(TokenKind::LParen, tag("(")),
        value(TokenKind::RParen, tag(")")),
    ))(input)
}

fn atom(input: &str) -> IResult<&str, TokenKind> {
    map(take_while1(is_atom_char), |_| TokenKind::Atom)(input)
}

fn token(input: &str) -> IResult<&str, TokenKind> {
    alt((operator, atom))(input)
}

/// Character offset of `rest` inside `full` (`rest` must be a suffix of `full`).
pub(crate) fn char_offset(full: &str, rest: &str) -> usize {
    full[..full.len() - rest.len()].chars().count()
}

/// Split `text` into tokens. Whitespace separates tokens and is otherwise ignored.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    loop {
        let trimmed = rest.trim_start();
        offset += char_offset(rest, trimmed);
        rest = trimmed;
        if rest.is_empty() {
            break;
        }

        match token(rest) {
            Ok((after, kind)) => {
                let lexeme = &rest[..rest.len() - after.len()];
                tokens.push(Token {
                    kind,
                    lexeme,
                    offset,
                });
                offset += lexeme.chars().count();
                rest = after;
            }
            Err(_) => {
                let found = rest.chars().next().unwrap_or(' ');
                return Err(SyntaxError::new(
                    text,
                    offset,
                    SyntaxErrorKind::UnexpectedCharacter(found),
                ));
            }
        }
    }

    Ok(tokens)
}
