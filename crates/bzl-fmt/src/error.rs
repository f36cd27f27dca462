/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use bzl_ast::{ExprKind, Span};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    ///A node sits in a slot that has no textual form for its kind.
    #[error("Unsupported node kind: {kind} can not be used as {context}")]
    UnsupportedNode {
        kind: ExprKind,
        context: &'static str,
        span: Option<Span>,
    },
}
