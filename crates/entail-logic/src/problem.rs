//! `TELL ... ASK ...` problem reader.
//!
//! ```text
//! TELL
//! p2 => p3; p3 => p1; p2;
//! ASK
//! p1
//! ```
//!
//! The TELL section is split on `;` into clauses (empty clauses dropped);
//! the ASK section holds exactly one expression.

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Location, Marker, ParseError, SyntaxError, SyntaxErrorKind};
use crate::expr::Expr;
use crate::lexer::{char_offset, is_atom_char};
use crate::parser::{parse_clause, parse_query};

/// Ordered KB clauses. Order only matters for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    clauses: Vec<Expr>,
}

impl KnowledgeBase {
    pub fn new(clauses: Vec<Expr>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Expr] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.clauses.iter()
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a Expr;
    type IntoIter = std::slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl FromIterator<Expr> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub kb: KnowledgeBase,
    pub query: Expr,
}

/// Byte positions of `marker` where it stands as a word of its own.
fn marker_positions(text: &str, marker: Marker) -> Vec<usize> {
    let word = marker.as_str();
    text.match_indices(word)
        .map(|(i, _)| i)
        .filter(|&i| {
            let before = text[..i].chars().next_back();
            let after = text[i + word.len()..].chars().next();
            !before.is_some_and(is_atom_char) && !after.is_some_and(is_atom_char)
        })
        .collect()
}

fn single_marker(text: &str, marker: Marker) -> Result<usize, FormatError> {
    match marker_positions(text, marker).as_slice() {
        [] => Err(FormatError::MissingMarker { marker }),
        [pos] => Ok(*pos),
        _ => Err(FormatError::DuplicateMarker { marker }),
    }
}

/// Split problem text into its raw TELL and ASK sections.
fn split_sections(text: &str) -> Result<(&str, &str), FormatError> {
    let tell = single_marker(text, Marker::Tell)?;
    let ask = single_marker(text, Marker::Ask)?;
    if ask < tell {
        return Err(FormatError::Misordered);
    }
    let tell_body = &text[tell + Marker::Tell.as_str().len()..ask];
    let ask_body = &text[ask + Marker::Ask.as_str().len()..];
    Ok((tell_body, ask_body))
}

/// Non-empty, trimmed clause strings of a TELL section.
pub fn split_clauses(tell_body: &str) -> Vec<&str> {
    tell_body
        .split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// The single query expression text of an ASK section.
///
/// Trailing `;` are tolerated; a second expression after a `;` is not.
fn query_text(ask_body: &str) -> Result<&str, SyntaxError> {
    let body = ask_body.trim();
    let Some((head, tail)) = body.split_once(';') else {
        return Ok(body);
    };
    if tail.split(';').all(|piece| piece.trim().is_empty()) {
        Ok(head.trim())
    } else {
        let offset = char_offset(body, &body[head.len()..]);
        Err(SyntaxError {
            location: Location::Query,
            text: body.to_string(),
            offset,
            kind: SyntaxErrorKind::MultipleQueries,
        })
    }
}

/// Read a whole problem: KB clauses in file order, then the query.
pub fn parse_problem(text: &str) -> Result<Problem, ParseError> {
    let (tell_body, ask_body) = split_sections(text)?;

    let clauses = split_clauses(tell_body)
        .into_iter()
        .enumerate()
        .map(|(index, clause)| {
            parse_clause(clause).map_err(|err| err.at(Location::Clause { index }))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let query = parse_query(query_text(ask_body)?)?;

    Ok(Problem {
        kb: KnowledgeBase::new(clauses),
        query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_clauses_in_order_and_the_query() {
        let problem = parse_problem(
            "TELL\np2=> p3; p3 => p1; c => e; b&e => f; f&g => h; p1=>d; p1&p3 => c; a; b; p2;\nASK\nd\n",
        )
        .expect("parse");
        assert_eq!(problem.kb.len(), 10);
        assert_eq!(problem.kb.clauses()[7].as_atom(), Some("a"));
        assert_eq!(problem.query, Expr::atom("d"));
    }

    #[test]
    fn empty_tell_section_is_an_empty_kb() {
        let problem = parse_problem("TELL ASK p || ~p").expect("parse");
        assert!(problem.kb.is_empty());
    }

    #[test]
    fn missing_ask_marker() {
        let err = parse_problem("TELL a; b;").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::Format(FormatError::MissingMarker { marker: Marker::Ask })
        );
    }

    #[test]
    fn missing_tell_marker() {
        let err = parse_problem("a; b; ASK a").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::Format(FormatError::MissingMarker {
                marker: Marker::Tell
            })
        );
    }

    #[test]
    fn markers_in_wrong_order() {
        let err = parse_problem("ASK a TELL a;").expect_err("should fail");
        assert_eq!(err, ParseError::Format(FormatError::Misordered));
    }

    #[test]
    fn duplicate_marker() {
        let err = parse_problem("TELL a; ASK a ASK b").expect_err("should fail");
        assert_eq!(
            err,
            ParseError::Format(FormatError::DuplicateMarker { marker: Marker::Ask })
        );
    }

    #[test]
    fn markers_inside_atom_names_are_not_markers() {
        let problem = parse_problem("TELL TASK => ASKED; TASK; ASK ASKED").expect("parse");
        assert_eq!(problem.kb.len(), 2);
        assert_eq!(problem.query, Expr::atom("ASKED"));
    }

    #[test]
    fn syntax_errors_carry_the_clause_index() {
        let err = parse_problem("TELL a; ; b =>; c; ASK a").expect_err("should fail");
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.location, Location::Clause { index: 1 });
                assert_eq!(err.text, "b =>");
                assert_eq!(err.offset, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_semicolon_after_query_is_tolerated() {
        let problem = parse_problem("TELL a; ASK a;\n").expect("parse");
        assert_eq!(problem.query, Expr::atom("a"));
    }

    #[test]
    fn second_query_expression_is_rejected() {
        let err = parse_problem("TELL a; ASK a; b").expect_err("should fail");
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.location, Location::Query);
                assert_eq!(err.kind, SyntaxErrorKind::MultipleQueries);
                assert_eq!(err.offset, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_query_is_a_syntax_error() {
        let err = parse_problem("TELL a; ASK   ").expect_err("should fail");
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.location, Location::Query);
                assert_eq!(err.kind, SyntaxErrorKind::EmptyExpression);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
