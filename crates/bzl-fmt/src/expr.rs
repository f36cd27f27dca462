/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use bzl_ast::{
    ops::{Assoc, Precedence, Side, UnaryOp},
    Expr, ExprTy,
};

use crate::{FormatError, FormatTree};

///True if `expr` should keep the line layout it had in the source.
pub(crate) fn is_multiline(expr: &Expr) -> bool {
    expr.layout_span()
        .map(|span| span.is_multiline())
        .unwrap_or(false)
}

///Lowers `expr` as operand of an operator with the given `precedence` and `assoc`. Adds parentheses if the
/// operand would otherwise bind differently when parsed again.
fn operand(
    expr: &Expr,
    precedence: Precedence,
    assoc: Assoc,
    side: Side,
) -> Result<FormatTree, FormatError> {
    let tree = FormatTree::try_from(expr)?;
    let own = expr.precedence();
    if own < precedence || (own == precedence && !assoc.allows(side)) {
        Ok(FormatTree::parenthesized(tree))
    } else {
        Ok(tree)
    }
}

fn sequence(
    left: char,
    right: char,
    items: &[Expr],
    multiline: bool,
) -> Result<FormatTree, FormatError> {
    Ok(FormatTree::Sequence {
        left,
        right,
        items: items
            .iter()
            .map(FormatTree::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        multiline,
        trailing_comma: true,
    })
}

impl TryFrom<&Expr> for FormatTree {
    type Error = FormatError;
    fn try_from(value: &Expr) -> Result<Self, Self::Error> {
        let tree = match &value.expr_ty {
            ExprTy::Literal(l) => FormatTree::from(l),
            ExprTy::Str(s) => FormatTree::from(s),
            ExprTy::Ident(i) => FormatTree::from(i),
            ExprTy::Binary { left, op, right } => FormatTree::BinaryOp {
                left: Box::new(operand(left, op.precedence(), op.assoc(), Side::Left)?),
                op: op.symbol().to_owned(),
                right: Box::new(operand(right, op.precedence(), op.assoc(), Side::Right)?),
            },
            ExprTy::Unary { op, operand: inner } => FormatTree::UnaryOp {
                op: match op {
                    UnaryOp::Not => "not ".to_owned(),
                    other => other.symbol().to_owned(),
                },
                operand: Box::new(operand(inner, op.precedence(), op.assoc(), Side::Right)?),
            },
            ExprTy::Paren(inner) => {
                let sub = FormatTree::try_from(inner.as_ref())?;
                if is_multiline(value) {
                    FormatTree::Sequence {
                        left: '(',
                        right: ')',
                        items: vec![sub],
                        multiline: true,
                        trailing_comma: false,
                    }
                } else {
                    FormatTree::parenthesized(sub)
                }
            }
            ExprTy::List(elements) => sequence('[', ']', elements, is_multiline(value))?,
            ExprTy::Call { callee, args } => FormatTree::Seq(vec![
                operand(callee, Precedence::Primary, Assoc::Left, Side::Left)?,
                sequence('(', ')', args, is_multiline(value))?,
            ]),
            ExprTy::Dot { receiver, name } => FormatTree::Seq(vec![
                operand(receiver, Precedence::Primary, Assoc::Left, Side::Left)?,
                FormatTree::token("."),
                FormatTree::from(name),
            ]),
            ExprTy::Load(load) => FormatTree::try_from_load(load, is_multiline(value))?,
        };
        Ok(tree)
    }
}
