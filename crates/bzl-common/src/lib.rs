/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! Common diagnosis helper. This is mostly the [Span] of nodes, as well as their reporting.

use std::{fmt::Display, ops::Range};

pub use ariadne;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::BzlError;

///Source-Code span information.
///
/// Lines and columns are 1-based, `to` is exclusive. A span where both lines are `0` is
/// _zeroed_ and does not point into any source text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    ///(line, column) of the first character.
    pub from: (usize, usize),
    ///(line, column) right after the last character.
    pub to: (usize, usize),
    ///Char offset of the first character in the source.
    pub char_start: usize,
    ///Char offset right after the last character.
    pub char_end: usize,
}

impl Span {
    pub fn empty() -> Self {
        Span::default()
    }

    ///True if the span does not point to any line. That is the case for
    /// zeroed spans.
    pub fn is_empty(&self) -> bool {
        self.from.0 == 0 && self.to.0 == 0
    }

    ///True if the spanned region covers more than one line.
    pub fn is_multiline(&self) -> bool {
        !self.is_empty() && self.from.0 != self.to.0
    }

    pub fn char_range(&self) -> Range<usize> {
        self.char_start..self.char_end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.from.0, self.from.1, self.to.0, self.to.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    fn span(from: (usize, usize), to: (usize, usize)) -> Span {
        Span {
            from,
            to,
            char_start: 0,
            char_end: 0,
        }
    }

    #[test]
    fn zeroed_span_is_empty() {
        assert!(Span::empty().is_empty());
        assert!(!Span::empty().is_multiline());
        assert!(!span((1, 1), (1, 4)).is_empty());
        assert!(span((1, 1), (3, 2)).is_multiline());
    }
}
