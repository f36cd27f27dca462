/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! Operators and their binding strength.

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

///Binding tightness of an expression. Ordered from loosest to tightest, so
/// `Precedence::Add < Precedence::Multiply`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Assign,
    Or,
    And,
    Not,
    Compare,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Add,
    Multiply,
    Unary,
    ///Anything that can not be split by an operator. Literals, identifiers,
    /// parenthesized expressions, lists, calls...
    Primary,
}

///On which side an operator allows an operand of the same precedence without grouping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
    NonAssoc,
}

///Position of an operand relative to its operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Assoc {
    ///True if an operand with the same precedence may sit on `side` without
    /// parentheses.
    pub fn allows(&self, side: Side) -> bool {
        matches!(
            (self, side),
            (Assoc::Left, Side::Left) | (Assoc::Right, Side::Right)
        )
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Pos,
    Inv,
    Not,
}

impl UnaryOp {
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Not => Precedence::Not,
            Self::Neg | Self::Pos | Self::Inv => Precedence::Unary,
        }
    }

    ///Prefix operators nest to the right, `not not a` or `- -a`.
    pub fn assoc(&self) -> Assoc {
        Assoc::Right
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Inv => "~",
            Self::Not => "not",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(Self::Neg),
            "+" => Some(Self::Pos),
            "~" => Some(Self::Inv),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    //assignments
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    FloorDivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    //logic
    Or,
    And,
    //comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    NotIn,
    //bitwise
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    //arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 33] = [
        Self::Assign,
        Self::AddAssign,
        Self::SubAssign,
        Self::MulAssign,
        Self::DivAssign,
        Self::FloorDivAssign,
        Self::ModAssign,
        Self::AndAssign,
        Self::OrAssign,
        Self::XorAssign,
        Self::ShlAssign,
        Self::ShrAssign,
        Self::Or,
        Self::And,
        Self::Eq,
        Self::NotEq,
        Self::Lt,
        Self::Gt,
        Self::Lte,
        Self::Gte,
        Self::In,
        Self::NotIn,
        Self::BitOr,
        Self::BitXor,
        Self::BitAnd,
        Self::Shl,
        Self::Shr,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::FloorDiv,
        Self::Mod,
    ];

    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Assign
            | Self::AddAssign
            | Self::SubAssign
            | Self::MulAssign
            | Self::DivAssign
            | Self::FloorDivAssign
            | Self::ModAssign
            | Self::AndAssign
            | Self::OrAssign
            | Self::XorAssign
            | Self::ShlAssign
            | Self::ShrAssign => Precedence::Assign,
            Self::Or => Precedence::Or,
            Self::And => Precedence::And,
            Self::Eq
            | Self::NotEq
            | Self::Lt
            | Self::Gt
            | Self::Lte
            | Self::Gte
            | Self::In
            | Self::NotIn => Precedence::Compare,
            Self::BitOr => Precedence::BitOr,
            Self::BitXor => Precedence::BitXor,
            Self::BitAnd => Precedence::BitAnd,
            Self::Shl | Self::Shr => Precedence::Shift,
            Self::Add | Self::Sub => Precedence::Add,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Precedence::Multiply,
        }
    }

    ///Assignments and comparisons do not chain (`a < b < c` is not valid), everything else
    /// groups from the left.
    pub fn assoc(&self) -> Assoc {
        match self.precedence() {
            Precedence::Assign | Precedence::Compare => Assoc::NonAssoc,
            _ => Assoc::Left,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::FloorDivAssign => "//=",
            Self::ModAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    ///All operators on the given precedence level.
    pub fn on_level(precedence: Precedence) -> impl Iterator<Item = BinaryOp> {
        Self::ALL
            .into_iter()
            .filter(move |op| op.precedence() == precedence)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_unique() {
        for op in BinaryOp::ALL {
            assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
        }
    }

    #[test]
    fn precedence_order() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Shl.precedence());
        assert!(BinaryOp::Eq.precedence() > UnaryOp::Not.precedence());
        assert!(UnaryOp::Not.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::Or.precedence() > BinaryOp::Assign.precedence());
        assert!(UnaryOp::Neg.precedence() > BinaryOp::Mul.precedence());
    }

    #[test]
    fn associativity() {
        assert!(BinaryOp::Add.assoc().allows(Side::Left));
        assert!(!BinaryOp::Add.assoc().allows(Side::Right));
        assert!(!BinaryOp::Lt.assoc().allows(Side::Left));
        assert!(!BinaryOp::Lt.assoc().allows(Side::Right));
        assert!(UnaryOp::Not.assoc().allows(Side::Right));
    }
}
