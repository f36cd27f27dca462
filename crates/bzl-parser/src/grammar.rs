/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */

//! The chumsky grammar.
//!
//! Expressions are built twice from the same parts. Once for the top level, where whitespace may not
//! cross a line end (the line end terminates the statement), and once for everything inside brackets, where
//! newlines are just whitespace. Every token consumes the whitespace _after_ it, so spans never include it.
//!
//! Spans produced here only carry char offsets. Lines and columns are filled in afterwards.

use std::ops::Range;

use bzl_ast::{
    ops::{BinaryOp, Precedence, UnaryOp},
    Comment, Expr, ExprTy, LoadArg, LoadStmt, Span,
};
use chumsky::{error::Simple, prelude::*, text, BoxedParser};

type P<'a, O> = BoxedParser<'a, char, O, Simple<char>>;

pub(crate) const KEYWORDS: &[&str] = &[
    "and", "break", "continue", "def", "elif", "else", "for", "if", "in", "lambda", "load", "not",
    "or", "pass", "return",
];

pub(crate) fn char_span(range: Range<usize>) -> Span {
    Span {
        char_start: range.start,
        char_end: range.end,
        ..Default::default()
    }
}

fn covering(first: &Expr, last: &Expr) -> Span {
    let start = first.span.map(|s| s.char_start).unwrap_or(0);
    let end = last.span.map(|s| s.char_end).unwrap_or(start);
    char_span(start..end)
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = covering(&left, &right);
    Expr::binary(left, op, right).with_span(span)
}

fn prefixed(op: UnaryOp, start: usize, operand: Expr) -> Expr {
    let end = operand.span.map(|s| s.char_end).unwrap_or(start);
    Expr::unary(op, operand).with_span(char_span(start..end))
}

fn comment() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    just('#')
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored()
}

///Spaces, tabs, escaped line ends and comments. Never consumes a plain `\n`.
fn inline_ws<'a>() -> P<'a, ()> {
    filter(|c: &char| *c == ' ' || *c == '\t' || *c == '\r')
        .ignored()
        .or(just('\\').then(just('\n')).ignored())
        .or(comment())
        .repeated()
        .ignored()
        .boxed()
}

fn multiline_ws<'a>() -> P<'a, ()> {
    filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment())
        .repeated()
        .ignored()
        .boxed()
}

fn number() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_digit())
        .chain(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '.' || *c == '_').repeated())
        .collect::<String>()
        .labelled("number")
}

fn quoted(quote: char) -> impl Parser<char, String, Error = Simple<char>> + Clone {
    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('"'),
        just('\''),
        just('n').to('\n'),
        just('t').to('\t'),
        just('r').to('\r'),
    )));

    just(quote)
        .ignore_then(
            filter(move |c: &char| *c != quote && *c != '\\' && *c != '\n')
                .or(escape)
                .repeated(),
        )
        .then_ignore(just(quote))
        .collect::<String>()
}

fn string() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    quoted('"').or(quoted('\'')).labelled("string")
}

fn name() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    text::ident()
        .try_map(|name: String, span| {
            if KEYWORDS.contains(&name.as_str()) {
                Err(Simple::custom(span, format!("Unexpected keyword `{name}`")))
            } else {
                Ok(name)
            }
        })
        .labelled("identifier")
}

fn symbol<'a>(op: BinaryOp) -> P<'a, ()> {
    match op {
        BinaryOp::And | BinaryOp::Or | BinaryOp::In => text::keyword(op.symbol()).boxed(),
        BinaryOp::NotIn => text::keyword("not")
            .then(one_of(" \t").repeated().at_least(1))
            .then(text::keyword("in"))
            .ignored()
            .boxed(),
        _ => just(op.symbol()).ignored().boxed(),
    }
}

///Any operator of the given binary `precedence` level.
fn operator<'a>(precedence: Precedence, ws: P<'a, ()>) -> P<'a, BinaryOp> {
    let mut ops: Vec<BinaryOp> = BinaryOp::on_level(precedence).collect();
    //longest first, so `//` wins over `/` and `<=` over `<`
    ops.sort_by_key(|op| std::cmp::Reverse(op.symbol().len()));
    ops.into_iter()
        .map(|op| symbol(op).to(op).boxed())
        .reduce(|a, b| a.or(b).boxed())
        .expect("operator() should only be called for binary precedence levels")
        .then_ignore(ws)
        .boxed()
}

///Left associative chain of `operand (op operand)*`.
fn left_chain<'a>(operand: P<'a, Expr>, precedence: Precedence, ws: P<'a, ()>) -> P<'a, Expr> {
    operand
        .clone()
        .then(operator(precedence, ws).then(operand).repeated())
        .foldl(|left, (op, right)| binary(left, op, right))
        .boxed()
}

///At most one `operand op operand`.
fn single<'a>(operand: P<'a, Expr>, precedence: Precedence, ws: P<'a, ()>) -> P<'a, Expr> {
    operand
        .clone()
        .then(operator(precedence, ws).then(operand).or_not())
        .map(|(left, rest)| match rest {
            Some((op, right)) => binary(left, op, right),
            None => left,
        })
        .boxed()
}

enum Suffix {
    Call(Vec<Expr>),
    Dot(String),
}

///Builds the full expression grammar on top of `ws`. `nested` parses whatever is allowed inside brackets.
fn expr_with<'a>(ws: P<'a, ()>, nested: P<'a, Expr>) -> P<'a, Expr> {
    let open = |c: char| just(c).then_ignore(multiline_ws());
    let comma = just(',').then_ignore(multiline_ws());
    let sequence = nested
        .clone()
        .separated_by(comma)
        .allow_trailing()
        .boxed();

    let leaf = choice((
        number().map(Expr::literal),
        string().map(Expr::string),
        name().map(Expr::ident),
    ));
    let paren = open('(')
        .ignore_then(nested)
        .then_ignore(just(')'))
        .map(Expr::paren);
    let list = open('[')
        .ignore_then(sequence.clone())
        .then_ignore(just(']'))
        .map(Expr::list);
    let atom = choice((leaf, paren, list))
        .map_with_span(|expr, span| expr.with_span(char_span(span)))
        .then_ignore(ws.clone())
        .boxed();

    let call = open('(')
        .ignore_then(sequence)
        .then_ignore(just(')'))
        .map(Suffix::Call);
    let dot = just('.')
        .then_ignore(ws.clone())
        .ignore_then(name())
        .map(Suffix::Dot);
    let postfix = atom
        .then(
            call.or(dot)
                .map_with_span(|suffix, span: Range<usize>| (suffix, span.end))
                .then_ignore(ws.clone())
                .repeated(),
        )
        .foldl(|receiver, (suffix, end)| {
            let start = receiver.span.map(|s| s.char_start).unwrap_or(0);
            let expr = match suffix {
                Suffix::Call(args) => Expr::call(receiver, args),
                Suffix::Dot(name) => Expr::dot(receiver, name),
            };
            expr.with_span(char_span(start..end))
        })
        .boxed();

    let unary = choice((
        just('-').to(UnaryOp::Neg),
        just('+').to(UnaryOp::Pos),
        just('~').to(UnaryOp::Inv),
    ))
    .map_with_span(|op, span: Range<usize>| (op, span.start))
    .then_ignore(ws.clone())
    .repeated()
    .then(postfix)
    .foldr(|(op, start), operand| prefixed(op, start, operand))
    .boxed();

    let mut operand = unary;
    for precedence in [
        Precedence::Multiply,
        Precedence::Add,
        Precedence::Shift,
        Precedence::BitAnd,
        Precedence::BitXor,
        Precedence::BitOr,
    ] {
        operand = left_chain(operand, precedence, ws.clone());
    }
    let compare = single(operand, Precedence::Compare, ws.clone());

    let not = text::keyword("not")
        .map_with_span(|_, span: Range<usize>| span.start)
        .then_ignore(ws.clone())
        .repeated()
        .then(compare)
        .foldr(|start, operand| prefixed(UnaryOp::Not, start, operand))
        .boxed();

    let and = left_chain(not, Precedence::And, ws.clone());
    let or = left_chain(and, Precedence::Or, ws.clone());
    single(or, Precedence::Assign, ws)
}

fn load<'a>() -> P<'a, Expr> {
    let ws = multiline_ws();
    let comma = just(',').then_ignore(ws.clone());

    let module = string()
        .map_with_span(|value, span| Expr::string(value).with_span(char_span(span)))
        .then_ignore(ws.clone());
    let quoted_name =
        string().map_with_span(|value, span: Range<usize>| (value, char_span(span)));
    let aliased = name()
        .map_with_span(|to, span| Expr::ident(to).with_span(char_span(span)))
        .then_ignore(ws.clone())
        .then_ignore(just('='))
        .then_ignore(ws.clone())
        .then(quoted_name.clone())
        .map(|(to, (from, span))| LoadArg {
            from: Expr::ident(from).with_span(span),
            to,
        });
    let plain = quoted_name.map(|(name, span): (String, Span)| LoadArg {
        from: Expr::ident(name.clone()).with_span(span),
        to: Expr::ident(name).with_span(span),
    });
    let binding = aliased.or(plain).then_ignore(ws.clone());

    text::keyword("load")
        .then_ignore(ws.clone())
        .ignore_then(just('('))
        .then_ignore(ws)
        .ignore_then(module)
        .then(comma.clone().ignore_then(binding).repeated())
        .then_ignore(comma.or_not())
        .then_ignore(just(')'))
        .map_with_span(|(module, args), span| {
            Expr::new(ExprTy::Load(Box::new(LoadStmt { module, args }))).with_span(char_span(span))
        })
        .labelled("load statement")
        .boxed()
}

///Parser for a whole file. Statements are terminated by a line end (or the end of input).
pub(crate) fn file_parser<'a>() -> P<'a, Vec<Expr>> {
    let nested = recursive(|nested| expr_with(multiline_ws(), nested.boxed()));
    let statement = load()
        .then_ignore(inline_ws())
        .or(expr_with(inline_ws(), nested.boxed()));
    let line_end = just('\n').ignored().or(end()).labelled("end of line");

    multiline_ws()
        .ignore_then(
            statement
                .then_ignore(line_end)
                .then_ignore(multiline_ws())
                .repeated(),
        )
        .then_ignore(end())
        .boxed()
}

///Collects all comments of an already parsed source. Strings are skipped, so a `#` inside of them is not
/// taken for a comment.
pub(crate) fn comments_parser<'a>() -> P<'a, Vec<Comment>> {
    let comment = just('#')
        .chain(filter(|c: &char| *c != '\n').repeated())
        .collect::<String>()
        .map_with_span(|content, span| {
            Some(Comment {
                span: char_span(span),
                content: content.trim_end().to_owned(),
            })
        });
    let skipped = string().ignored().or(any().ignored()).to(None);

    comment
        .or(skipped)
        .repeated()
        .then_ignore(end())
        .map(|found| found.into_iter().flatten().collect())
        .boxed()
}

///Parser for a single expression, newlines are treated as whitespace.
pub(crate) fn expr_parser<'a>() -> P<'a, Expr> {
    let nested = recursive(|nested| expr_with(multiline_ws(), nested.boxed()));
    multiline_ws()
        .ignore_then(nested)
        .then_ignore(end())
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(src: &str) -> Expr {
        expr_parser().parse(src).expect("expression should parse")
    }

    #[test]
    fn operators_respect_precedence() {
        let e = expr("1 + 2 * 3");
        match e.expr_ty {
            ExprTy::Binary { op, right, .. } => {
                assert_eq!(op, BinaryOp::Add);
                assert_eq!(right.kind(), bzl_ast::ExprKind::Binary);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn longest_operator_wins() {
        match expr("a // b").expr_ty {
            ExprTy::Binary { op, .. } => assert_eq!(op, BinaryOp::FloorDiv),
            other => panic!("unexpected {other:?}"),
        }
        match expr("a <= b").expr_ty {
            ExprTy::Binary { op, .. } => assert_eq!(op, BinaryOp::Lte),
            other => panic!("unexpected {other:?}"),
        }
        match expr("a += b").expr_ty {
            ExprTy::Binary { op, .. } => assert_eq!(op, BinaryOp::AddAssign),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn not_and_not_in() {
        match expr("not a in b").expr_ty {
            ExprTy::Unary { op, operand } => {
                assert_eq!(op, UnaryOp::Not);
                assert!(matches!(
                    operand.expr_ty,
                    ExprTy::Binary {
                        op: BinaryOp::In,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            expr("a not in b").expr_ty,
            ExprTy::Binary {
                op: BinaryOp::NotIn,
                ..
            }
        ));
    }

    #[test]
    fn strings_are_unescaped() {
        assert_eq!(expr(r#""a\"b\n""#).as_str(), Some("a\"b\n"));
        assert_eq!(expr("'single'").as_str(), Some("single"));
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(expr_parser().parse("and").is_err());
        assert_eq!(expr("android").as_ident(), Some("android"));
    }

    #[test]
    fn newlines_inside_brackets() {
        let e = expr("[\n    1,\n    2,\n]");
        match e.expr_ty {
            ExprTy::List(elements) => assert_eq!(elements.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn comments_are_collected_outside_of_strings() {
        let comments = comments_parser()
            .parse("# head\nx = \"#not\"  # tail  \n")
            .expect("comments should be found");
        let found: Vec<_> = comments
            .iter()
            .map(|c| (c.content.as_str(), c.span.char_start))
            .collect();
        assert_eq!(found, [("# head", 0), ("# tail", 19)]);
    }

    #[test]
    fn statements_end_at_line_end() {
        let stmts = file_parser().parse("a = 1\nb = 2").expect("file should parse");
        assert_eq!(stmts.len(), 2);
        assert!(file_parser().parse("a = 1 b = 2").is_err());
    }
}
