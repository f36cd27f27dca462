/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! # Bzl-AST
//!
//! The *A*bstract *S*yntax *T*ree of BUILD / Starlark-like files.
//!
//! The tree is a strict ownership tree of [Expr] nodes. Statements (assignments, calls, `load`s) are just
//! expressions on the top level of a [File]. Every node kind lists its child slots in source order
//! (see [ExprTy::children]), which is all the generic machinery in [util] needs:
//!
//! - [util::walk] / [util::walk_once] for read-only traversal,
//! - [util::edit] / [util::try_edit] for top-down rewriting.
//!
//! Each node optionally carries a [Span]. Nodes without (or with a zeroed) span are _synthesized_, i.e. created
//! by a rewrite instead of the parser. The formatter uses that to decide on the node's layout.
//!
//! Comments are not part of the tree. A [File] keeps them next to its statements, ordered by their
//! location, so traversal and rewriting never see them.
//!
//! Operators and their binding strength live in [ops].

pub use bzl_common::Span;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod expr;
pub mod ops;
pub mod util;

pub use expr::{
    Children, ChildrenMut, Expr, ExprKind, ExprTy, Ident, LoadArg, LoadStmt, Literal,
    StringLiteral,
};

///A `# ...` comment. `content` includes the leading `#`, trailing whitespace is not part of it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub span: Span,
    pub content: String,
}

///A whole parsed file. An ordered list of top-level statements.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct File {
    ///The file this was parsed from, if any.
    pub path: Option<String>,
    pub stmts: Vec<Expr>,
    ///All comments of the source, in source order.
    pub comments: Vec<Comment>,
}

impl File {
    pub fn new(stmts: Vec<Expr>) -> Self {
        File {
            path: None,
            stmts,
            comments: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    ///Walks every statement as its own root. See [util::walk].
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Expr, &[&'a Expr])) {
        for stmt in &self.stmts {
            util::walk(stmt, &mut visit);
        }
    }

    ///Rewrites every statement, in order. See [util::edit].
    pub fn edit<F>(self, mut rewrite: F) -> File
    where
        F: FnMut(&Expr, &[&Expr]) -> Option<Expr>,
    {
        File {
            stmts: self
                .stmts
                .into_iter()
                .map(|stmt| util::edit(stmt, &mut rewrite))
                .collect(),
            ..self
        }
    }

    ///Fallible version of [File::edit]. Stops at the first error.
    pub fn try_edit<E, F>(self, mut rewrite: F) -> Result<File, E>
    where
        F: FnMut(&Expr, &[&Expr]) -> Result<Option<Expr>, E>,
    {
        let stmts = self
            .stmts
            .into_iter()
            .map(|stmt| util::try_edit(stmt, &mut rewrite))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(File { stmts, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::BinaryOp;

    fn example() -> File {
        File::new(vec![
            Expr::binary(Expr::ident("a"), BinaryOp::Assign, Expr::literal("1")),
            Expr::call(Expr::ident("f"), vec![Expr::ident("a")]),
        ])
    }

    #[test]
    fn walk_visits_each_statement_as_root() {
        let file = example();
        let mut roots = 0;
        let mut total = 0;
        file.walk(|_, ancestors| {
            total += 1;
            if ancestors.is_empty() {
                roots += 1;
            }
        });
        assert_eq!(roots, 2);
        assert_eq!(total, 6);
    }

    #[test]
    fn edit_rewrites_all_statements() {
        let file = example().edit(|e, _| match e.as_ident() {
            Some("a") => Some(Expr::ident("b")),
            _ => None,
        });
        let mut idents = Vec::new();
        file.walk(|e, _| {
            if let Some(name) = e.as_ident() {
                idents.push(name);
            }
        });
        assert_eq!(idents, ["b", "f", "b"]);
    }

    #[test]
    fn edit_keeps_comments() {
        let comment = Comment {
            span: Span::empty(),
            content: "# keep".to_owned(),
        };
        let file = example()
            .with_comments(vec![comment.clone()])
            .edit(|_, _| Some(Expr::ident("x")));
        assert_eq!(file.comments, [comment]);
        assert_eq!(file.stmts, [Expr::ident("x"), Expr::ident("x")]);
    }

    #[test]
    fn try_edit_stops_at_first_error() {
        let mut offered = 0;
        let result = example().try_edit(|e, _| {
            offered += 1;
            if e.kind() == ExprKind::Call {
                Err(e.kind())
            } else {
                Ok(None)
            }
        });
        assert_eq!(result, Err(ExprKind::Call));
        assert_eq!(offered, 4);
    }
}
