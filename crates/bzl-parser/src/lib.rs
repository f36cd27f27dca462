/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! # Bzl-Parser
//!
//! Parses the BUILD / Starlark subset modelled by [bzl_ast] into a [File].
//!
//! Supported are assignments, calls (with keyword arguments), `load` statements, lists, attribute access and
//! the full Starlark operator set. Every parsed node carries its [Span]. Comments are collected into
//! [File::comments].
//!
//! ```rust
//! let file = bzl_parser::parse_string("x = 1 + 2\n").unwrap();
//! assert_eq!(file.stmts.len(), 1);
//! ```

use std::path::Path;

use bzl_ast::{util::walk_once_mut, Expr, File, Span};
use bzl_common::BzlError;
use chumsky::{
    error::{Simple, SimpleReason},
    Parser,
};

pub mod error;
mod grammar;

pub use error::ParserError;

///Parses `source` as a whole file.
pub fn parse_string(source: &str) -> Result<File, BzlError<ParserError>> {
    let lines = LineIndex::new(source);
    let mut stmts = grammar::file_parser()
        .parse(source)
        .map_err(|errors| lines.to_error(errors))?;
    let mut comments = grammar::comments_parser()
        .parse(source)
        .map_err(|errors| lines.to_error(errors))?;

    for stmt in &mut stmts {
        locate(stmt, &lines);
    }
    for comment in &mut comments {
        comment.span = lines.span(comment.span.char_start, comment.span.char_end);
    }
    log::debug!(
        "parsed {} statement(s), {} comment(s)",
        stmts.len(),
        comments.len()
    );
    Ok(File::new(stmts).with_comments(comments))
}

///Reads and parses the file at `path`. Errors are tagged with the file name.
pub fn parse_file(path: impl AsRef<Path>) -> Result<File, BzlError<ParserError>> {
    let path = path.as_ref();
    let name = path.to_string_lossy().into_owned();

    let bytes = std::fs::read(path)
        .map_err(|e| BzlError::new(ParserError::from(e)).with_file(name.clone()))?;
    let source = String::from_utf8(bytes)
        .map_err(|e| BzlError::new(ParserError::from(e)).with_file(name.clone()))?;

    let mut file = parse_string(&source).map_err(|e| e.with_file(name.clone()))?;
    file.path = Some(name);
    Ok(file)
}

///Parses a single expression. Newlines are allowed anywhere between tokens.
pub fn parse_expr(source: &str) -> Result<Expr, BzlError<ParserError>> {
    let lines = LineIndex::new(source);
    let mut expr = grammar::expr_parser()
        .parse(source)
        .map_err(|errors| lines.to_error(errors))?;
    locate(&mut expr, &lines);
    Ok(expr)
}

///Fills in lines and columns of all spans below `expr`, based on their char offsets.
fn locate(expr: &mut Expr, lines: &LineIndex) {
    if let Some(span) = expr.span.as_mut() {
        *span = lines.span(span.char_start, span.char_end);
    }
    walk_once_mut(expr, |child| locate(child, lines));
}

///Char offsets of all line starts.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(idx, _)| idx + 1),
        );
        LineIndex { source, starts }
    }

    ///1-based (line, column) of the char at `offset`.
    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|start| *start <= offset);
        (line, offset - self.starts[line - 1] + 1)
    }

    fn span(&self, char_start: usize, char_end: usize) -> Span {
        Span {
            from: self.position(char_start),
            to: self.position(char_end),
            char_start,
            char_end,
        }
    }

    ///The word (or single char) starting at `offset`, if any.
    fn token_at(&self, offset: usize) -> Option<String> {
        let mut chars = self.source.chars().skip(offset).peekable();
        let first = *chars.peek()?;
        if first.is_alphanumeric() || first == '_' {
            Some(
                chars
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect(),
            )
        } else {
            Some(first.to_string())
        }
    }

    fn to_error(&self, errors: Vec<Simple<char>>) -> BzlError<ParserError> {
        let Some(error) = errors.into_iter().next() else {
            return BzlError::new(ParserError::Custom("Unknown parser error".to_owned()));
        };

        let range = error.span();
        let span = self.span(range.start, range.end);
        let found = self.token_at(range.start);
        let kind = match (error.reason(), found) {
            (SimpleReason::Custom(message), _) => ParserError::Custom(message.clone()),
            (SimpleReason::Unclosed { delimiter, .. }, _) => ParserError::Unclosed {
                delimiter: *delimiter,
            },
            (SimpleReason::Unexpected, Some(token))
                if grammar::KEYWORDS.contains(&token.as_str()) =>
            {
                ParserError::Keyword(token)
            }
            (SimpleReason::Unexpected, found) => ParserError::Syntax {
                expected: describe_expected(&error),
                found: found
                    .map(|token| format!("`{}`", token.escape_debug()))
                    .unwrap_or_else(|| "end of input".to_owned()),
            },
        };

        let message = match error.label() {
            Some(label) => format!("While parsing {label}"),
            None => "Here".to_owned(),
        };
        BzlError::error_here(kind, span, message)
    }
}

fn describe_expected(error: &Simple<char>) -> String {
    let mut expected: Vec<String> = error
        .expected()
        .map(|token| match token {
            Some(c) => format!("{c:?}"),
            None => "end of input".to_owned(),
        })
        .collect();
    expected.sort();
    expected.dedup();

    match expected.len() {
        0 => "something else".to_owned(),
        1 => expected.remove(0),
        _ => format!("one of {}", expected.join(", ")),
    }
}
