/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use bzl_ast::{Comment, Ident, Literal, StringLiteral};

use crate::FormatTree;

impl From<&Comment> for FormatTree {
    fn from(value: &Comment) -> Self {
        FormatTree::Token(value.content.clone())
    }
}

impl From<&Ident> for FormatTree {
    fn from(value: &Ident) -> Self {
        FormatTree::Token(value.0.clone())
    }
}

impl From<&Literal> for FormatTree {
    fn from(value: &Literal) -> Self {
        FormatTree::Token(value.token.clone())
    }
}

impl From<&StringLiteral> for FormatTree {
    fn from(value: &StringLiteral) -> Self {
        FormatTree::Token(quote(&value.value))
    }
}

///Double quotes `value`, escaping everything that can not appear verbatim.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
