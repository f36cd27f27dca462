/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! The expression and statement nodes.

use std::fmt::Display;

use bzl_common::Span;
use smallvec::SmallVec;

use crate::ops::{BinaryOp, Precedence, UnaryOp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///Child slots of a node. Most nodes have at most two.
pub type Children<'a> = SmallVec<[&'a Expr; 4]>;
pub type ChildrenMut<'a> = SmallVec<[&'a mut Expr; 4]>;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident(pub String);

impl Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///Atomic token like `42` or `0x1f`. The token is kept as written.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub token: String,
}

///A quoted string. `value` is the unescaped content.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StringLiteral {
    pub value: String,
}

///One imported binding of a [LoadStmt]. `from` is the name in the loaded module,
/// `to` the name it is bound to locally. Both are expected to be [ExprTy::Ident]s.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LoadArg {
    pub from: Expr,
    pub to: Expr,
}

///`load("//module.bzl", "a", b = "c")`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LoadStmt {
    ///The loaded module. Expected to be a [ExprTy::Str].
    pub module: Expr,
    pub args: Vec<LoadArg>,
}

impl LoadStmt {
    ///Names as they appear in the loaded module.
    pub fn from_names(&self) -> impl Iterator<Item = &Expr> {
        self.args.iter().map(|arg| &arg.from)
    }

    ///Names as they are bound locally.
    pub fn to_names(&self) -> impl Iterator<Item = &Expr> {
        self.args.iter().map(|arg| &arg.to)
    }
}

///Syntax element. `span` is `None` for nodes that were synthesized instead of parsed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub span: Option<Span>,
    pub expr_ty: ExprTy,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ExprTy {
    Literal(Literal),
    Str(StringLiteral),
    Ident(Ident),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    ///Explicit `( )` grouping as written by the user, or inserted by a rewrite.
    Paren(Box<Expr>),
    List(Vec<Expr>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Dot {
        receiver: Box<Expr>,
        name: Ident,
    },
    Load(Box<LoadStmt>),
}

///Plain discriminant of [ExprTy], mostly for diagnostics and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Literal,
    Str,
    Ident,
    Binary,
    Unary,
    Paren,
    List,
    Call,
    Dot,
    Load,
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Literal => "literal",
            Self::Str => "string",
            Self::Ident => "identifier",
            Self::Binary => "binary expression",
            Self::Unary => "unary expression",
            Self::Paren => "parenthesized expression",
            Self::List => "list",
            Self::Call => "call",
            Self::Dot => "dot expression",
            Self::Load => "load statement",
        };
        write!(f, "{name}")
    }
}

impl ExprTy {
    pub fn kind(&self) -> ExprKind {
        match self {
            Self::Literal(_) => ExprKind::Literal,
            Self::Str(_) => ExprKind::Str,
            Self::Ident(_) => ExprKind::Ident,
            Self::Binary { .. } => ExprKind::Binary,
            Self::Unary { .. } => ExprKind::Unary,
            Self::Paren(_) => ExprKind::Paren,
            Self::List(_) => ExprKind::List,
            Self::Call { .. } => ExprKind::Call,
            Self::Dot { .. } => ExprKind::Dot,
            Self::Load(_) => ExprKind::Load,
        }
    }

    ///All child slots in source order. A load statement yields its module first,
    /// followed by `from` and `to` of each binding, pair by pair.
    pub fn children(&self) -> Children<'_> {
        let mut children = SmallVec::new();
        match self {
            Self::Literal(_) | Self::Str(_) | Self::Ident(_) => {}
            Self::Binary { left, right, .. } => {
                children.push(left.as_ref());
                children.push(right.as_ref());
            }
            Self::Unary { operand, .. } => children.push(operand.as_ref()),
            Self::Paren(inner) => children.push(inner.as_ref()),
            Self::List(elements) => children.extend(elements.iter()),
            Self::Call { callee, args } => {
                children.push(callee.as_ref());
                children.extend(args.iter());
            }
            Self::Dot { receiver, .. } => children.push(receiver.as_ref()),
            Self::Load(load) => {
                children.push(&load.module);
                for arg in &load.args {
                    children.push(&arg.from);
                    children.push(&arg.to);
                }
            }
        }
        children
    }

    ///Same as [children](Self::children), but yields the mutable slots.
    pub fn children_mut(&mut self) -> ChildrenMut<'_> {
        let mut children = SmallVec::new();
        match self {
            Self::Literal(_) | Self::Str(_) | Self::Ident(_) => {}
            Self::Binary { left, right, .. } => {
                children.push(left.as_mut());
                children.push(right.as_mut());
            }
            Self::Unary { operand, .. } => children.push(operand.as_mut()),
            Self::Paren(inner) => children.push(inner.as_mut()),
            Self::List(elements) => children.extend(elements.iter_mut()),
            Self::Call { callee, args } => {
                children.push(callee.as_mut());
                children.extend(args.iter_mut());
            }
            Self::Dot { receiver, .. } => children.push(receiver.as_mut()),
            Self::Load(load) => {
                let LoadStmt { module, args } = load.as_mut();
                children.push(module);
                for arg in args.iter_mut() {
                    children.push(&mut arg.from);
                    children.push(&mut arg.to);
                }
            }
        }
        children
    }

    pub fn child_count(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Str(_) | Self::Ident(_) => 0,
            Self::Unary { .. } | Self::Paren(_) | Self::Dot { .. } => 1,
            Self::Binary { .. } => 2,
            Self::List(elements) => elements.len(),
            Self::Call { args, .. } => 1 + args.len(),
            Self::Load(load) => 1 + 2 * load.args.len(),
        }
    }

    ///The `index`-th child slot, in the order of [children](Self::children).
    pub fn child(&self, index: usize) -> Option<&Expr> {
        match self {
            Self::Literal(_) | Self::Str(_) | Self::Ident(_) => None,
            Self::Binary { left, right, .. } => match index {
                0 => Some(left.as_ref()),
                1 => Some(right.as_ref()),
                _ => None,
            },
            Self::Unary { operand: inner, .. }
            | Self::Paren(inner)
            | Self::Dot {
                receiver: inner, ..
            } => (index == 0).then_some(inner.as_ref()),
            Self::List(elements) => elements.get(index),
            Self::Call { callee, args } => match index {
                0 => Some(callee.as_ref()),
                _ => args.get(index - 1),
            },
            Self::Load(load) => match index {
                0 => Some(&load.module),
                _ => {
                    let arg = load.args.get((index - 1) / 2)?;
                    if (index - 1) % 2 == 0 {
                        Some(&arg.from)
                    } else {
                        Some(&arg.to)
                    }
                }
            },
        }
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Expr> {
        match self {
            Self::Literal(_) | Self::Str(_) | Self::Ident(_) => None,
            Self::Binary { left, right, .. } => match index {
                0 => Some(left.as_mut()),
                1 => Some(right.as_mut()),
                _ => None,
            },
            Self::Unary { operand: inner, .. }
            | Self::Paren(inner)
            | Self::Dot {
                receiver: inner, ..
            } => (index == 0).then_some(inner.as_mut()),
            Self::List(elements) => elements.get_mut(index),
            Self::Call { callee, args } => match index {
                0 => Some(callee.as_mut()),
                _ => args.get_mut(index - 1),
            },
            Self::Load(load) => match index {
                0 => Some(&mut load.module),
                _ => {
                    let arg = load.args.get_mut((index - 1) / 2)?;
                    if (index - 1) % 2 == 0 {
                        Some(&mut arg.from)
                    } else {
                        Some(&mut arg.to)
                    }
                }
            },
        }
    }
}

impl Expr {
    pub fn new(expr_ty: ExprTy) -> Self {
        Expr {
            span: None,
            expr_ty,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn literal(token: impl Into<String>) -> Self {
        Self::new(ExprTy::Literal(Literal {
            token: token.into(),
        }))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprTy::Str(StringLiteral {
            value: value.into(),
        }))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprTy::Ident(Ident(name.into())))
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::new(ExprTy::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprTy::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn paren(inner: Expr) -> Self {
        Self::new(ExprTy::Paren(Box::new(inner)))
    }

    pub fn list(elements: Vec<Expr>) -> Self {
        Self::new(ExprTy::List(elements))
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprTy::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn dot(receiver: Expr, name: impl Into<String>) -> Self {
        Self::new(ExprTy::Dot {
            receiver: Box::new(receiver),
            name: Ident(name.into()),
        })
    }

    ///Builds a load statement from the parallel `from` and `to` name lists.
    /// Returns `None` if both lists differ in length.
    pub fn load(
        module: impl Into<String>,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Option<Self> {
        let from: Vec<String> = from.into_iter().map(Into::into).collect();
        let to: Vec<String> = to.into_iter().map(Into::into).collect();
        if from.len() != to.len() {
            return None;
        }

        let args = from
            .into_iter()
            .zip(to)
            .map(|(from, to)| LoadArg {
                from: Expr::ident(from),
                to: Expr::ident(to),
            })
            .collect();
        Some(Self::new(ExprTy::Load(Box::new(LoadStmt {
            module: Expr::string(module),
            args,
        }))))
    }

    pub fn kind(&self) -> ExprKind {
        self.expr_ty.kind()
    }

    ///True if the node has no (or a zeroed) source location, which is the case for nodes
    /// created by rewrites.
    pub fn is_synthesized(&self) -> bool {
        self.span.map(|s| s.is_empty()).unwrap_or(true)
    }

    ///The span, if it points into source text.
    pub fn layout_span(&self) -> Option<Span> {
        self.span.filter(|s| !s.is_empty())
    }

    pub fn precedence(&self) -> Precedence {
        match &self.expr_ty {
            ExprTy::Binary { op, .. } => op.precedence(),
            ExprTy::Unary { op, .. } => op.precedence(),
            _ => Precedence::Primary,
        }
    }

    pub fn children(&self) -> Children<'_> {
        self.expr_ty.children()
    }

    pub fn children_mut(&mut self) -> ChildrenMut<'_> {
        self.expr_ty.children_mut()
    }

    pub fn child_count(&self) -> usize {
        self.expr_ty.child_count()
    }

    pub fn child(&self, index: usize) -> Option<&Expr> {
        self.expr_ty.child(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Expr> {
        self.expr_ty.child_mut(index)
    }

    ///Returns the identifier's name, if `self` is one.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.expr_ty {
            ExprTy::Ident(i) => Some(i.0.as_str()),
            _ => None,
        }
    }

    ///Returns the string's value, if `self` is one.
    pub fn as_str(&self) -> Option<&str> {
        match &self.expr_ty {
            ExprTy::Str(s) => Some(s.value.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_slots_are_paired() {
        let load = Expr::load("//:foo.bzl", ["x", "z"], ["y", "z"]).unwrap();
        assert_eq!(load.child_count(), 5);
        let names: Vec<_> = load
            .children()
            .into_iter()
            .map(|c| c.as_ident().or(c.as_str()).unwrap().to_owned())
            .collect();
        assert_eq!(names, ["//:foo.bzl", "x", "y", "z", "z"]);

        for (idx, child) in load.children().into_iter().enumerate() {
            assert_eq!(load.child(idx), Some(child));
        }
        assert_eq!(load.child(5), None);
    }

    #[test]
    fn load_rejects_unequal_names() {
        assert!(Expr::load("//:foo.bzl", ["x"], ["y", "z"]).is_none());
    }

    #[test]
    fn child_and_children_agree() {
        let call = Expr::call(
            Expr::dot(Expr::ident("native"), "glob"),
            vec![
                Expr::list(vec![Expr::string("*.cc")]),
                Expr::binary(
                    Expr::ident("exclude"),
                    BinaryOp::Assign,
                    Expr::list(vec![]),
                ),
            ],
        );
        assert_eq!(call.child_count(), call.children().len());
        for (idx, child) in call.children().into_iter().enumerate() {
            assert_eq!(call.child(idx), Some(child));
        }

        let mut call = call;
        let count = call.children_mut().len();
        assert_eq!(count, 3);
        *call.child_mut(1).unwrap() = Expr::ident("srcs");
        assert_eq!(call.child(1).and_then(Expr::as_ident), Some("srcs"));
    }

    #[test]
    fn synthesized_nodes() {
        assert!(Expr::literal("1").is_synthesized());
        assert!(Expr::literal("1").with_span(Span::empty()).is_synthesized());
        let span = Span {
            from: (1, 1),
            to: (1, 2),
            char_start: 0,
            char_end: 1,
        };
        assert!(!Expr::literal("1").with_span(span).is_synthesized());
    }
}
