/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use bzl_ast::{Expr, LoadArg, LoadStmt};

use crate::{common::quote, FormatError, FormatTree};

fn unsupported(expr: &Expr, context: &'static str) -> FormatError {
    FormatError::UnsupportedNode {
        kind: expr.kind(),
        context,
        span: expr.span,
    }
}

fn binding_name<'a>(expr: &'a Expr, context: &'static str) -> Result<&'a str, FormatError> {
    expr.as_ident().ok_or_else(|| unsupported(expr, context))
}

impl TryFrom<&LoadArg> for FormatTree {
    type Error = FormatError;
    fn try_from(value: &LoadArg) -> Result<Self, Self::Error> {
        let from = binding_name(&value.from, "load source name")?;
        let to = binding_name(&value.to, "load binding name")?;

        //`"x"` imports x as x, everything else is aliased with `to = "from"`
        if from == to {
            Ok(FormatTree::Token(quote(from)))
        } else {
            Ok(FormatTree::BinaryOp {
                left: Box::new(FormatTree::token(to)),
                op: "=".to_owned(),
                right: Box::new(FormatTree::Token(quote(from))),
            })
        }
    }
}

impl FormatTree {
    pub(crate) fn try_from_load(load: &LoadStmt, multiline: bool) -> Result<Self, FormatError> {
        let module = load
            .module
            .as_str()
            .ok_or_else(|| unsupported(&load.module, "load module"))?;

        let mut items = Vec::with_capacity(load.args.len() + 1);
        items.push(FormatTree::Token(quote(module)));
        for arg in &load.args {
            items.push(FormatTree::try_from(arg)?);
        }

        Ok(FormatTree::Seq(vec![
            FormatTree::token("load"),
            FormatTree::Sequence {
                left: '(',
                right: ')',
                items,
                multiline,
                trailing_comma: true,
            },
        ]))
    }
}

#[cfg(test)]
mod tests {
    use bzl_ast::{ExprKind, ExprTy};

    use crate::{FormatError, Formater};

    use super::*;

    #[test]
    fn plain_and_aliased_bindings() {
        let load = Expr::load("//:foo.bzl", ["x", "z"], ["x", "y"]).unwrap();
        assert_eq!(
            Formater::format_expr(&load).unwrap().to_string(),
            "load(\"//:foo.bzl\", \"x\", y = \"z\")"
        );
    }

    #[test]
    fn non_identifier_binding_is_rejected() {
        let mut load = Expr::load("//:foo.bzl", ["x"], ["x"]).unwrap();
        if let ExprTy::Load(stmt) = &mut load.expr_ty {
            stmt.args[0].to = Expr::literal("1");
        }
        let err = Formater::format_expr(&load).unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnsupportedNode {
                kind: ExprKind::Literal,
                context: "load binding name",
                ..
            }
        ));
    }

    #[test]
    fn non_string_module_is_rejected() {
        let mut load = Expr::load("//:foo.bzl", ["x"], ["x"]).unwrap();
        *load.child_mut(0).unwrap() = Expr::ident("module");
        let err = Formater::format_expr(&load).unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnsupportedNode {
                kind: ExprKind::Ident,
                ..
            }
        ));
    }
}
