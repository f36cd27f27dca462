/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! Built-in rewrites and statistics.

use ahash::AHashMap;
use bzl_ast::{
    util::{AstTransformer, AstVisitor},
    Expr, ExprKind, ExprTy, File,
};

///Replaces every (nested) parenthesized expression by its content. The formatter adds back the parentheses
/// that are required by operator precedence.
#[derive(Default)]
pub struct StripParens {
    pub removed: usize,
}

impl AstTransformer for StripParens {
    fn expr(&mut self, expr: &Expr, _ancestors: &[&Expr]) -> Option<Expr> {
        let mut inner = expr;
        while let ExprTy::Paren(sub) = &inner.expr_ty {
            self.removed += 1;
            inner = sub.as_ref();
        }

        if std::ptr::eq(inner, expr) {
            None
        } else {
            Some(inner.clone())
        }
    }
}

///Counts nodes per kind, and the deepest nesting.
#[derive(Default)]
pub struct KindCounter {
    pub kinds: AHashMap<ExprKind, usize>,
    pub max_depth: usize,
}

impl KindCounter {
    pub fn count(file: &File) -> Self {
        let mut counter = KindCounter::default();
        for stmt in &file.stmts {
            stmt.traverse_visit(&mut counter);
        }
        counter
    }

    pub fn log(&self) {
        let mut kinds: Vec<_> = self.kinds.iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in kinds {
            log::debug!("{count:>6} x {kind}");
        }
        log::debug!("max depth: {}", self.max_depth);
    }
}

impl AstVisitor for KindCounter {
    fn expr(&mut self, expr: &Expr, ancestors: &[&Expr]) {
        *self.kinds.entry(expr.kind()).or_insert(0) += 1;
        self.max_depth = self.max_depth.max(ancestors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_parens() {
        let file = bzl_parser::parse_string("x = ((1 + 2)) * (3)\n").unwrap();
        let mut strip = StripParens::default();
        let stmt = file.stmts[0].clone().traverse_trans(&mut strip);
        assert_eq!(strip.removed, 3);

        let formated = bzl_fmt::render(&File::new(vec![stmt])).unwrap();
        assert_eq!(formated, "x = (1 + 2) * 3\n");
    }

    #[test]
    fn count_kinds() {
        let file = bzl_parser::parse_string("a = [1, 2]\nf(a)\n").unwrap();
        let counter = KindCounter::count(&file);
        assert_eq!(counter.kinds.get(&ExprKind::Literal), Some(&2));
        assert_eq!(counter.kinds.get(&ExprKind::Ident), Some(&3));
        assert_eq!(counter.kinds.get(&ExprKind::Call), Some(&1));
        assert_eq!(counter.max_depth, 2);
    }
}
