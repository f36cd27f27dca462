/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! Top-down rewriting of a tree.
//!
//! Slots are addressed by their index path from the root. For each position the engine resolves the node
//! and its ancestors, asks the rewrite callback, and substitutes the returned replacement itself. That way
//! the callback always sees a consistent tree, including replacements that happened earlier in the walk.

use std::convert::Infallible;

use smallvec::SmallVec;

use crate::Expr;

type SlotPath = SmallVec<[usize; 16]>;

///Rewrites the tree at `root` top-down.
///
/// `rewrite` is offered every position exactly once, together with the strict ancestors of the node
/// (root first). Returning `Some(replacement)` puts `replacement` into the slot, after which the engine
/// continues with the replacement's children. A replacement is not offered to `rewrite` again, so a
/// callback that wants to simplify repeatedly has to loop on its own before returning.
///
/// Returns the new root.
pub fn edit<F>(root: Expr, mut rewrite: F) -> Expr
where
    F: FnMut(&Expr, &[&Expr]) -> Option<Expr>,
{
    match try_edit(root, |node, ancestors| {
        Ok::<_, Infallible>(rewrite(node, ancestors))
    }) {
        Ok(root) => root,
        Err(never) => match never {},
    }
}

///Fallible version of [edit]. The first error returned by `rewrite` aborts the edit and is handed back
/// to the caller as-is. The partially edited tree is dropped in that case.
pub fn try_edit<E, F>(mut root: Expr, mut rewrite: F) -> Result<Expr, E>
where
    F: FnMut(&Expr, &[&Expr]) -> Result<Option<Expr>, E>,
{
    let mut path = SlotPath::new();
    let replaced = edit_slot(&mut root, &mut path, &mut rewrite)?;
    log::debug!("edit replaced {replaced} node(s)");
    Ok(root)
}

fn edit_slot<E, F>(root: &mut Expr, path: &mut SlotPath, rewrite: &mut F) -> Result<usize, E>
where
    F: FnMut(&Expr, &[&Expr]) -> Result<Option<Expr>, E>,
{
    //One shared resolve per slot. The path is only resolved mutably again if the slot actually changes.
    let (replacement, mut child_count) = {
        let (node, ancestors) = resolve(root, path);
        (rewrite(node, &ancestors)?, node.child_count())
    };

    let mut replaced = 0;
    if let Some(replacement) = replacement {
        //NOTE: the children of the replacement, never the original's.
        child_count = replacement.child_count();
        let slot = resolve_mut(root, path);
        log::trace!(
            "replacing {} at {:?} with {}",
            slot.kind(),
            path.as_slice(),
            replacement.kind()
        );
        *slot = replacement;
        replaced += 1;
    }

    for index in 0..child_count {
        path.push(index);
        replaced += edit_slot(root, path, rewrite)?;
        path.pop();
    }

    Ok(replaced)
}

fn resolve<'a>(root: &'a Expr, path: &[usize]) -> (&'a Expr, SmallVec<[&'a Expr; 16]>) {
    let mut ancestors = SmallVec::new();
    let mut node = root;
    for &index in path {
        ancestors.push(node);
        node = node
            .child(index)
            .expect("edit path should always point to an existing slot");
    }
    (node, ancestors)
}

fn resolve_mut<'a>(root: &'a mut Expr, path: &[usize]) -> &'a mut Expr {
    path.iter().fold(root, |node, &index| {
        node.child_mut(index)
            .expect("edit path should always point to an existing slot")
    })
}

///Trait-based alternative to passing a closure to [edit].
pub trait AstTransformer {
    ///Returns the replacement for `expr`, or `None` to keep it.
    fn expr(&mut self, expr: &Expr, ancestors: &[&Expr]) -> Option<Expr>;
}

impl Expr {
    pub fn traverse_trans<T: AstTransformer>(self, transformer: &mut T) -> Expr {
        edit(self, |expr, ancestors| transformer.expr(expr, ancestors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ops::BinaryOp, util::walk, ExprKind, ExprTy};

    fn names(expr: &Expr) -> Vec<String> {
        let mut names = Vec::new();
        walk(expr, |e, _| {
            names.push(match &e.expr_ty {
                ExprTy::Binary { op, .. } => op.to_string(),
                ExprTy::Literal(l) => l.token.clone(),
                ExprTy::Ident(i) => i.0.clone(),
                ExprTy::Paren(_) => "()".to_owned(),
                _ => "?".to_owned(),
            })
        });
        names
    }

    fn example() -> Expr {
        Expr::binary(
            Expr::paren(Expr::paren(Expr::literal("1"))),
            BinaryOp::Add,
            Expr::binary(Expr::literal("2"), BinaryOp::Mul, Expr::literal("3")),
        )
    }

    #[test]
    fn noop_edit_keeps_tree() {
        let before = example();
        let mut offered = 0;
        let after = edit(before.clone(), |_, _| {
            offered += 1;
            None
        });
        assert_eq!(before, after);
        assert_eq!(offered, 7);
    }

    #[test]
    fn offers_every_position_once_in_pre_order() {
        let mut offered = Vec::new();
        let _ = edit(example(), |e, _| {
            offered.push(e.kind());
            None
        });
        assert_eq!(
            offered,
            [
                ExprKind::Binary,
                ExprKind::Paren,
                ExprKind::Paren,
                ExprKind::Literal,
                ExprKind::Binary,
                ExprKind::Literal,
                ExprKind::Literal
            ]
        );
    }

    #[test]
    fn replacement_is_not_reoffered_but_its_children_are() {
        let mut offered = Vec::new();
        let edited = edit(Expr::literal("1"), |e, ancestors| {
            offered.push((e.kind(), ancestors.len()));
            match &e.expr_ty {
                ExprTy::Literal(_) if ancestors.is_empty() => Some(Expr::binary(
                    e.clone(),
                    BinaryOp::Add,
                    Expr::literal("2"),
                )),
                _ => None,
            }
        });

        assert_eq!(names(&edited), ["+", "1", "2"]);
        assert_eq!(
            offered,
            [
                (ExprKind::Literal, 0),
                (ExprKind::Literal, 1),
                (ExprKind::Literal, 1)
            ]
        );
    }

    #[test]
    fn replacement_with_fewer_children() {
        let mut offered = Vec::new();
        let edited = edit(example(), |e, ancestors| {
            offered.push(e.kind());
            if ancestors.len() == 1 && e.kind() == ExprKind::Binary {
                Some(Expr::literal("6"))
            } else {
                None
            }
        });
        assert_eq!(names(&edited), ["+", "()", "()", "1", "6"]);
        assert_eq!(
            offered,
            [
                ExprKind::Binary,
                ExprKind::Paren,
                ExprKind::Paren,
                ExprKind::Literal,
                ExprKind::Binary
            ]
        );
    }

    #[test]
    fn wrap_literals_unless_parent_is_paren() {
        let edited = edit(
            Expr::binary(Expr::literal("1"), BinaryOp::Add, Expr::literal("2")),
            |e, ancestors| {
                if let Some(parent) = ancestors.last() {
                    if parent.kind() == ExprKind::Paren {
                        return None;
                    }
                }
                if e.kind() == ExprKind::Literal {
                    return Some(Expr::paren(e.clone()));
                }
                None
            },
        );
        assert_eq!(names(&edited), ["+", "()", "1", "()", "2"]);
    }

    #[test]
    fn iterative_unwrap_inside_callback() {
        let edited = edit(example(), |e, _| {
            let mut current = e;
            while let ExprTy::Paren(inner) = &current.expr_ty {
                current = inner.as_ref();
            }
            if std::ptr::eq(current, e) {
                None
            } else {
                Some(current.clone())
            }
        });
        assert_eq!(names(&edited), ["+", "1", "*", "2", "3"]);
    }

    #[test]
    fn ancestors_see_earlier_replacements() {
        //Replace the root, then check that children see the replacement as their parent.
        let mut parents = Vec::new();
        let _ = edit(example(), |e, ancestors| {
            if let Some(parent) = ancestors.last() {
                parents.push(parent.kind());
            }
            if ancestors.is_empty() {
                Some(Expr::list(vec![Expr::literal("1"), Expr::literal("2")]))
            } else {
                None
            }
        });
        assert_eq!(parents, [ExprKind::List, ExprKind::List]);
    }

    #[test]
    fn errors_abort_the_edit() {
        let mut offered = 0;
        let result = try_edit(example(), |e, _| {
            offered += 1;
            if e.kind() == ExprKind::Literal {
                Err(format!("found literal after {offered} nodes"))
            } else {
                Ok(None)
            }
        });
        assert_eq!(result, Err("found literal after 4 nodes".to_owned()));
        assert_eq!(offered, 4);
    }

    #[test]
    fn transformer_trait() {
        struct Renamer;
        impl AstTransformer for Renamer {
            fn expr(&mut self, expr: &Expr, _ancestors: &[&Expr]) -> Option<Expr> {
                match expr.as_ident() {
                    Some("old") => Some(Expr::ident("new")),
                    _ => None,
                }
            }
        }

        let expr = Expr::call(Expr::ident("old"), vec![Expr::ident("old")]);
        let renamed = expr.traverse_trans(&mut Renamer);
        assert_eq!(
            renamed,
            Expr::call(Expr::ident("new"), vec![Expr::ident("new")])
        );
    }
}
