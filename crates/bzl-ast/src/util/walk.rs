/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use crate::Expr;

///Calls `visit_child` once for each direct child slot of `node` in source order. Does not recurse
/// and does not call `visit_child` on `node` itself.
///
/// Use this as the building block for custom traversals, for instance to collect pre- and post-order
/// at the same time.
pub fn walk_once<'a>(node: &'a Expr, mut visit_child: impl FnMut(&'a Expr)) {
    for child in node.children() {
        visit_child(child);
    }
}

///Same as [walk_once], but hands out the mutable child slots, so they can be replaced.
pub fn walk_once_mut(node: &mut Expr, mut visit_child: impl FnMut(&mut Expr)) {
    for child in node.children_mut() {
        visit_child(child);
    }
}

///Pre-order traversal of the tree at `root`. `visit` is called exactly once per node, parents before
/// their children, siblings left to right.
///
/// The second argument to `visit` are the node's strict ancestors, root first, parent last.
pub fn walk<'a>(root: &'a Expr, mut visit: impl FnMut(&'a Expr, &[&'a Expr])) {
    let mut ancestors = Vec::new();
    walk_node(root, &mut ancestors, &mut visit);
}

fn walk_node<'a, F>(node: &'a Expr, ancestors: &mut Vec<&'a Expr>, visit: &mut F)
where
    F: FnMut(&'a Expr, &[&'a Expr]),
{
    visit(node, ancestors);
    ancestors.push(node);
    walk_once(node, |child| walk_node(child, ancestors, visit));
    ancestors.pop();
}

///Trait-based alternative to passing a closure to [walk].
pub trait AstVisitor {
    fn expr(&mut self, expr: &Expr, ancestors: &[&Expr]);
}

impl Expr {
    pub fn traverse_visit<V: AstVisitor>(&self, visitor: &mut V) {
        walk(self, |expr, ancestors| visitor.expr(expr, ancestors));
    }
}
