/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! # Bzl-Fmt
//!
//! Renders a [bzl_ast] tree back into source text.
//!
//! The AST is first lowered into a [FormatTree], which is then printed by [Formater]'s [Display] implementation.
//! While lowering, operands get parentheses exactly where the operator precedence and associativity require
//! them. [ExprTy::Paren](bzl_ast::ExprTy::Paren) nodes are always printed as-is, so grouping a user (or a
//! rewrite) placed intentionally is never lost.
//!
//! Bracketed sequences (lists, calls, loads, parentheses) keep the layout they had in the source: if their span
//! covers more than one line they are printed one element per line. Synthesized nodes are always printed compact.
//!
//! Comments of a [File] are emitted on the statement level, see [Formater::format_file].

use std::fmt::Display;

use bzl_ast::{Comment, Expr, File};

mod common;
mod error;
mod expr;
mod load;

pub use error::FormatError;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatTree {
    ///Top level statements. Each one is printed on its own line.
    Block {
        lines: Vec<Self>,
        ///`gaps[i]` is true if a blank line precedes `lines[i]`.
        gaps: Vec<bool>,
    },
    ///Wraps a sub tree into the given chars, without any line break.
    Wrapped {
        left: char,
        right: char,
        sub: Box<Self>,
    },
    ///Bracketed, comma separated items.
    Sequence {
        left: char,
        right: char,
        items: Vec<Self>,
        ///Prints one item per line, indented by one level.
        multiline: bool,
        ///Puts a `,` after the last item, if printed multiline.
        trailing_comma: bool,
    },
    ///Just a simple Token that'll be emitted as-is
    Token(String),
    ///Sub trees printed right after each other.
    Seq(Vec<Self>),
    UnaryOp {
        op: String,
        operand: Box<Self>,
    },
    BinaryOp {
        left: Box<Self>,
        right: Box<Self>,
        op: String,
    },
}

impl FormatTree {
    pub fn token(token: impl Into<String>) -> Self {
        FormatTree::Token(token.into())
    }

    pub fn parenthesized(sub: Self) -> Self {
        FormatTree::Wrapped {
            left: '(',
            right: ')',
            sub: Box::new(sub),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indentation {
    //Uses a single tab for identation
    Tabs,
    //Uses the given amount of spaces.
    Spaces(usize),
}

impl Default for Indentation {
    fn default() -> Self {
        Indentation::Spaces(4)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    pub indentation: Indentation,
}

///A formated [File] or [Expr]. Use [Display] to get the text.
#[derive(Debug, Clone)]
pub struct Formater {
    tree: FormatTree,
    config: FormatConfig,
}

impl Formater {
    ///Lowers all statements of `file`. Fails if any node can not be printed.
    ///
    /// Comments are placed by their source line. A comment on the last line of a statement trails that
    /// statement, all others get their own line before the next statement. That includes comments inside of a
    /// multi-line statement, which are moved in front of it.
    pub fn format_file(file: &File) -> Result<Self, FormatError> {
        log::debug!(
            "formatting {} statement(s), {} comment(s)",
            file.stmts.len(),
            file.comments.len()
        );
        let mut block = BlockBuilder::default();
        let mut comments = file.comments.iter().peekable();
        for stmt in &file.stmts {
            let tree = FormatTree::try_from(stmt)?;
            let Some(span) = stmt.layout_span() else {
                block.push(tree, None);
                continue;
            };

            while let Some(comment) = comments.next_if(|c| c.span.from.0 < span.from.0) {
                block.push_comment(comment, comment.span.from.0);
            }
            while let Some(comment) = comments.next_if(|c| c.span.from.0 < span.to.0) {
                log::debug!("moving comment at {} in front of its statement", comment.span);
                block.push_comment(comment, span.from.0);
            }

            let line = match comments.next_if(|c| c.span.from.0 == span.to.0) {
                Some(trailing) => FormatTree::Seq(vec![
                    tree,
                    FormatTree::token("  "),
                    FormatTree::from(trailing),
                ]),
                None => tree,
            };
            block.push(line, Some((span.from.0, span.to.0)));
        }
        for comment in comments {
            block.push_comment(comment, comment.span.from.0);
        }

        Ok(Formater {
            tree: FormatTree::Block {
                lines: block.lines,
                gaps: block.gaps,
            },
            config: FormatConfig::default(),
        })
    }

    ///Lowers a single expression. The printed text has no trailing newline.
    pub fn format_expr(expr: &Expr) -> Result<Self, FormatError> {
        Ok(Formater {
            tree: FormatTree::try_from(expr)?,
            config: FormatConfig::default(),
        })
    }

    pub fn with_config(mut self, config: FormatConfig) -> Self {
        self.config = config;
        self
    }
}

///Collects the lines of a [FormatTree::Block].
#[derive(Default)]
struct BlockBuilder {
    lines: Vec<FormatTree>,
    gaps: Vec<bool>,
    last_line: Option<usize>,
}

impl BlockBuilder {
    ///Pushes `tree`, which covers the source lines `lines`, or none if it was synthesized. One or more blank
    /// source lines before it become a single gap.
    fn push(&mut self, tree: FormatTree, lines: Option<(usize, usize)>) {
        let gap = match (self.last_line, lines) {
            (Some(last), Some((from, _))) => from > last + 1,
            _ => false,
        };
        self.lines.push(tree);
        self.gaps.push(gap);
        self.last_line = lines.map(|(_, to)| to);
    }

    fn push_comment(&mut self, comment: &Comment, line: usize) {
        self.push(FormatTree::from(comment), Some((line, line)));
    }
}

///Renders `file` with the default configuration.
pub fn render(file: &File) -> Result<String, FormatError> {
    Ok(Formater::format_file(file)?.to_string())
}

#[derive(Clone)]
struct FormatingState {
    indentation: Indentation,
    ident_level: usize,
}

impl FormatingState {
    fn nested(&self) -> Self {
        FormatingState {
            indentation: self.indentation.clone(),
            ident_level: self.ident_level + 1,
        }
    }

    ///Adds the current level of identation to `f`.
    fn ident_on(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.indentation {
            Indentation::Tabs => {
                for _l in 0..self.ident_level {
                    write!(f, "\t")?
                }
                Ok(())
            }
            Indentation::Spaces(count_per_level) => {
                write!(f, "{:width$}", "", width = count_per_level * self.ident_level)
            }
        }
    }
}

impl FormatTree {
    //Depth first formating walker on the Formating tree.
    fn format(&self, f: &mut std::fmt::Formatter<'_>, state: &FormatingState) -> std::fmt::Result {
        match self {
            FormatTree::Block { lines, gaps } => {
                for (idx, line) in lines.iter().enumerate() {
                    if gaps.get(idx).copied().unwrap_or(false) {
                        writeln!(f)?;
                    }
                    state.ident_on(f)?;
                    line.format(f, state)?;
                    writeln!(f)?;
                }
                Ok(())
            }
            FormatTree::Wrapped { left, right, sub } => {
                write!(f, "{left}")?;
                sub.format(f, state)?;
                write!(f, "{right}")
            }
            FormatTree::Sequence {
                left,
                right,
                items,
                multiline,
                trailing_comma,
            } => {
                write!(f, "{left}")?;
                if *multiline && !items.is_empty() {
                    let inner = state.nested();
                    for item in items {
                        writeln!(f)?;
                        inner.ident_on(f)?;
                        item.format(f, &inner)?;
                        if *trailing_comma {
                            write!(f, ",")?;
                        }
                    }
                    writeln!(f)?;
                    state.ident_on(f)?;
                } else {
                    for (idx, item) in items.iter().enumerate() {
                        if idx > 0 {
                            write!(f, ", ")?;
                        }
                        item.format(f, state)?;
                    }
                }
                write!(f, "{right}")
            }
            FormatTree::Token(token) => write!(f, "{token}"),
            FormatTree::Seq(seq) => {
                for item in seq {
                    item.format(f, state)?;
                }
                Ok(())
            }
            FormatTree::UnaryOp { op, operand } => {
                write!(f, "{op}")?;
                operand.format(f, state)
            }
            FormatTree::BinaryOp { left, right, op } => {
                left.format(f, state)?;
                write!(f, " {op} ")?;
                right.format(f, state)
            }
        }
    }
}

impl Display for Formater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = FormatingState {
            indentation: self.config.indentation.clone(),
            ident_level: 0,
        };

        self.tree.format(f, &state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(multiline: bool) -> FormatTree {
        FormatTree::Sequence {
            left: '[',
            right: ']',
            items: vec![FormatTree::token("1"), FormatTree::token("2")],
            multiline,
            trailing_comma: true,
        }
    }

    fn print(tree: FormatTree, config: FormatConfig) -> String {
        Formater { tree, config }.to_string()
    }

    #[test]
    fn compact_sequence() {
        assert_eq!(print(seq(false), FormatConfig::default()), "[1, 2]");
    }

    #[test]
    fn multiline_sequence_uses_indentation() {
        assert_eq!(
            print(seq(true), FormatConfig::default()),
            "[\n    1,\n    2,\n]"
        );
        assert_eq!(
            print(
                seq(true),
                FormatConfig {
                    indentation: Indentation::Tabs
                }
            ),
            "[\n\t1,\n\t2,\n]"
        );
    }

    #[test]
    fn block_keeps_gaps() {
        let tree = FormatTree::Block {
            lines: vec![
                FormatTree::token("a"),
                FormatTree::token("b"),
                FormatTree::token("c"),
            ],
            gaps: vec![false, true, false],
        };
        assert_eq!(print(tree, FormatConfig::default()), "a\n\nb\nc\n");
    }
}
