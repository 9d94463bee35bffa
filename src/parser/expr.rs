use super::decl::{type_base, TypeName};
use super::spanned::{Span, Spanned};
use super::token::{Ctrl, KeyWord, Token};
use super::{ctrl, keyword, nothing, recursive, symbol, ParseContext, Parser};
use crate::op::{AssignOp, BinaryOp, IncDecOp, UnaryOp};

use std::fmt;

// Expr ->
//  || Conditional
//  || Conditional AssignOp Expr
//
// Conditional ->
//  || Binop
//  || Binop ? Expr : Expr
//
// Binop -> one level per precedence, loosest first:
//  || ||  &&  |  ^  &  == !=  < > <= >= instanceof  << >>  + -  * / %
//
// Unary ->
//  || (+ | - | ~ | !) Unary
//  || (++ | --) Unary
//  || ( Type ) Unary
//  || Postfix
//
// Postfix ->
//  || Primary (++ | --)*
//
// Primary ->
//  || PrimaryBase Suffix*
//
// PrimaryBase ->
//  || Literal
//  || this | super
//  || ( Expr )
//  || new ClassType ( Args )
//  || new Type [ Expr ]+ [ ]*
//  || Ident
//
// Suffix ->
//  || . Ident
//  || [ Expr ]
//  || ( Args )

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub Vec<String>);

impl Name {
    pub fn simple(ident: impl Into<String>) -> Self {
        Name(vec![ident.into()])
    }

    pub fn is_simple(&self) -> bool {
        self.0.len() == 1
    }

    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(String),
    Float(String),
    Char(String),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Name(Name),
    This,
    Super,
    ArrayAccess {
        array: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    FieldAccess {
        target: Box<Spanned<Expr>>,
        field: String,
    },
    Call {
        target: Option<Box<Spanned<Expr>>>,
        method: String,
        args: Vec<Spanned<Expr>>,
    },
    New {
        class: Name,
        args: Vec<Spanned<Expr>>,
    },
    NewArray {
        elem: TypeName,
        dims: Vec<Spanned<Expr>>,
        extra_dims: usize,
    },
    ArrayInit(Vec<Spanned<Expr>>),
    Unary {
        op: UnaryOp,
        expr: Box<Spanned<Expr>>,
    },
    IncDec {
        op: IncDecOp,
        prefix: bool,
        expr: Box<Spanned<Expr>>,
    },
    Cast {
        ty: TypeName,
        expr: Box<Spanned<Expr>>,
    },
    Binop {
        lhs: Box<Spanned<Expr>>,
        op: BinaryOp,
        rhs: Box<Spanned<Expr>>,
    },
    InstanceOf {
        expr: Box<Spanned<Expr>>,
        ty: TypeName,
    },
    Conditional {
        cond: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        otherwise: Box<Spanned<Expr>>,
    },
    Assign {
        dest: Box<Spanned<Expr>>,
        op: AssignOp,
        src: Box<Spanned<Expr>>,
    },
}

enum ExprSuffix {
    Access { field: String },
    Index { index: Box<Spanned<Expr>> },
    Call { args: Vec<Spanned<Expr>> },
}

enum RelationalSuffix {
    Compare(BinaryOp, Spanned<Expr>),
    InstanceOf(Spanned<TypeName>),
}

impl Expr {
    fn append_suffix(expr: Spanned<Expr>, suffix: Spanned<ExprSuffix>) -> Spanned<Expr> {
        let span = expr.span.join(suffix.span);
        let expr_span = expr.span;

        let new_expr = match suffix.item {
            ExprSuffix::Access { field } => match expr.item {
                Expr::Name(Name(mut parts)) => {
                    parts.push(field);
                    Expr::Name(Name(parts))
                }
                item => Expr::FieldAccess {
                    target: Box::new(Spanned::new(item, expr_span)),
                    field,
                },
            },
            ExprSuffix::Index { index } => Expr::ArrayAccess {
                array: Box::new(expr),
                index,
            },
            ExprSuffix::Call { args } => match expr.item {
                Expr::Name(Name(mut parts)) => {
                    let method = parts.pop().unwrap_or_default();
                    let target = if parts.is_empty() {
                        None
                    } else {
                        Some(Box::new(Spanned::new(Expr::Name(Name(parts)), expr_span)))
                    };

                    Expr::Call { target, method, args }
                }
                Expr::FieldAccess { target, field } => Expr::Call {
                    target: Some(target),
                    method: field,
                    args,
                },
                Expr::This => Expr::Call {
                    target: None,
                    method: "this".to_string(),
                    args,
                },
                Expr::Super => Expr::Call {
                    target: None,
                    method: "super".to_string(),
                    args,
                },
                item => Expr::Call {
                    target: Some(Box::new(Spanned::new(item, expr_span))),
                    method: String::new(),
                    args,
                },
            },
        };

        Spanned::new(new_expr, span)
    }

    fn binop(lhs: Spanned<Expr>, (op, rhs): (BinaryOp, Spanned<Expr>)) -> Spanned<Expr> {
        let span = lhs.span.join(rhs.span);

        Spanned::new(
            Expr::Binop {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    /// Whether the expression may appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Name(_) | Expr::ArrayAccess { .. } | Expr::FieldAccess { .. }
        )
    }
}

pub fn expr<'a>() -> Parser<'a, Spanned<Expr>> {
    recursive(|ep| {
        let conditional = conditional_expr(ep.clone());
        let rhs = assign_op().append(ep.expect("Expected expression after assignment operator"));

        conditional.mix(rhs, |dest, rhs| {
            Some(match rhs {
                Some((op, src)) => {
                    let span = dest.span.join(src.span);

                    Spanned::new(
                        Expr::Assign {
                            dest: Box::new(dest),
                            op,
                            src: Box::new(src),
                        },
                        span,
                    )
                }
                None => dest,
            })
        })
    })
}

/// A variable initializer: an expression or a braced array initializer.
pub fn var_init<'a>() -> Parser<'a, Spanned<Expr>> {
    recursive(|init| {
        let items = init
            .delimited_list(ctrl(Ctrl::Comma))
            .closed_by(ctrl(Ctrl::Comma).optional())
            .or(nothing().map(|_| vec![]));
        let array_init = items
            .delimited(
                ctrl(Ctrl::LeftCurly),
                ctrl(Ctrl::RightCurly).expect("Expected '}' to close the array initializer"),
            )
            .map(Expr::ArrayInit)
            .spanned();

        array_init.or(expr())
    })
}

fn assign_op<'a>() -> Parser<'a, AssignOp> {
    Parser::new(move |ctx| {
        let spanned_token = ctx.peek()?;

        match spanned_token.item {
            Token::Ctrl(ctrl) => {
                let op = ctrl.as_assign_op()?;
                ctx.adv();
                Some(op)
            }
            _ => None,
        }
    })
}

fn conditional_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    let then = ctrl(Ctrl::Question).then(ep.clone().expect("Expected expression after '?'"));
    let otherwise = ctrl(Ctrl::Colon)
        .expect("Expected ':' in conditional expression")
        .then(ep.clone().expect("Expected expression after ':'"));

    binop_expr(ep).mix(then.append(otherwise), |cond, arms| {
        Some(match arms {
            Some((then, otherwise)) => {
                let span = cond.span.join(otherwise.span);

                Spanned::new(
                    Expr::Conditional {
                        cond: Box::new(cond),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    },
                    span,
                )
            }
            None => cond,
        })
    })
}

fn binop_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    let unary = unary_expr(ep);

    let multiplicative = binary_level(
        unary,
        &[
            (Ctrl::Multiply, BinaryOp::Multiply),
            (Ctrl::Divide, BinaryOp::Divide),
            (Ctrl::Modulo, BinaryOp::Modulo),
        ],
    );
    let additive = binary_level(
        multiplicative,
        &[(Ctrl::Plus, BinaryOp::Plus), (Ctrl::Minus, BinaryOp::Minus)],
    );
    let shift = binary_level(
        additive,
        &[
            (Ctrl::ShiftLeft, BinaryOp::ShiftLeft),
            (Ctrl::ShiftRight, BinaryOp::ShiftRight),
        ],
    );
    let relational = relational_level(shift);
    let equality = binary_level(
        relational,
        &[
            (Ctrl::DoubleEqual, BinaryOp::Equal),
            (Ctrl::NotEqual, BinaryOp::NotEqual),
        ],
    );
    let bit_and = binary_level(equality, &[(Ctrl::Ampersand, BinaryOp::BitAnd)]);
    let bit_xor = binary_level(bit_and, &[(Ctrl::Carrot, BinaryOp::BitXor)]);
    let bit_or = binary_level(bit_xor, &[(Ctrl::Pipe, BinaryOp::BitOr)]);
    let and = binary_level(bit_or, &[(Ctrl::And, BinaryOp::And)]);

    binary_level(and, &[(Ctrl::Or, BinaryOp::Or)])
}

fn binary_level<'a>(
    operand: Parser<'a, Spanned<Expr>>,
    ops: &'static [(Ctrl, BinaryOp)],
) -> Parser<'a, Spanned<Expr>> {
    let rhs = binop(ops).append(
        operand
            .clone()
            .expect("Expected expression after binary operator"),
    );

    operand
        .append(rhs.zero_or_more())
        .map(|(first, rest)| rest.into_iter().fold(first, Expr::binop))
}

fn relational_level(operand: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    let compare = binop(&[
        (Ctrl::Lt, BinaryOp::Lt),
        (Ctrl::Gt, BinaryOp::Gt),
        (Ctrl::Lte, BinaryOp::Lte),
        (Ctrl::Gte, BinaryOp::Gte),
    ])
    .append(
        operand
            .clone()
            .expect("Expected expression after binary operator"),
    )
    .map(|(op, rhs)| RelationalSuffix::Compare(op, rhs));
    let instance_of = keyword(KeyWord::InstanceOf)
        .then(
            type_base()
                .spanned()
                .expect("Expected a type after 'instanceof'"),
        )
        .map(RelationalSuffix::InstanceOf);

    operand
        .append(compare.or(instance_of).zero_or_more())
        .map(|(first, rest)| {
            rest.into_iter().fold(first, |lhs, suffix| match suffix {
                RelationalSuffix::Compare(op, rhs) => Expr::binop(lhs, (op, rhs)),
                RelationalSuffix::InstanceOf(ty) => {
                    let span = lhs.span.join(ty.span);

                    Spanned::new(
                        Expr::InstanceOf {
                            expr: Box::new(lhs),
                            ty: ty.item,
                        },
                        span,
                    )
                }
            })
        })
}

fn binop<'a>(ops: &'static [(Ctrl, BinaryOp)]) -> Parser<'a, BinaryOp> {
    Parser::new(move |ctx| match ctx.peek() {
        Some(spanned_token) => match spanned_token.item {
            Token::Ctrl(ctrl) => {
                let (_, op) = ops.iter().find(|(c, _)| *c == ctrl)?;
                ctx.adv();
                Some(*op)
            }
            _ => None,
        },
        None => None,
    })
}

fn unary_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    recursive(move |up| {
        let operand = up.clone().expect("Expected expression after unary operator");

        let unary = unary_op()
            .append(operand.clone())
            .map(|(op, expr)| Expr::Unary {
                op,
                expr: Box::new(expr),
            })
            .spanned();

        let pre_inc_dec = inc_dec_op()
            .append(operand.clone())
            .map(|(op, expr)| Expr::IncDec {
                op,
                prefix: true,
                expr: Box::new(expr),
            })
            .spanned();

        let cast = super::decl::type_name()
            .delimited(
                ctrl(Ctrl::LeftParen),
                ctrl(Ctrl::RightParen).expect("Expected ')' to close the cast"),
            )
            .append(operand)
            .map(|(ty, expr)| Expr::Cast {
                ty,
                expr: Box::new(expr),
            })
            .spanned()
            .when(looks_like_cast);

        unary
            .or(pre_inc_dec)
            .or(cast)
            .or(postfix_expr(ep.clone()))
    })
}

fn unary_op<'a>() -> Parser<'a, UnaryOp> {
    Parser::new(move |ctx| {
        let op = match ctx.peek()?.item {
            Token::Ctrl(Ctrl::Plus) => UnaryOp::Plus,
            Token::Ctrl(Ctrl::Minus) => UnaryOp::Negate,
            Token::Ctrl(Ctrl::Tilde) => UnaryOp::BitNot,
            Token::Ctrl(Ctrl::Not) => UnaryOp::Not,
            _ => return None,
        };

        ctx.adv();
        Some(op)
    })
}

fn inc_dec_op<'a>() -> Parser<'a, IncDecOp> {
    Parser::new(move |ctx| {
        let op = match ctx.peek()?.item {
            Token::Ctrl(Ctrl::Increment) => IncDecOp::Increment,
            Token::Ctrl(Ctrl::Decrement) => IncDecOp::Decrement,
            _ => return None,
        };

        ctx.adv();
        Some(op)
    })
}

// `( Type ) operand` vs `( Expr )`: primitive types always start a cast, a
// parenthesised name only when an operand that cannot continue an
// expression follows it.
fn looks_like_cast(ctx: &mut ParseContext<'_>) -> bool {
    if ctx.peek_nth(0) != Some(Token::Ctrl(Ctrl::LeftParen)) {
        return false;
    }

    match ctx.peek_nth(1) {
        Some(Token::KeyWord(keyword)) if keyword.is_primitive_type() => true,
        Some(Token::Ident(_)) => {
            let mut i = 2;

            while ctx.peek_nth(i) == Some(Token::Ctrl(Ctrl::Period))
                && matches!(ctx.peek_nth(i + 1), Some(Token::Ident(_)))
            {
                i += 2;
            }

            while ctx.peek_nth(i) == Some(Token::Ctrl(Ctrl::LeftBracket))
                && ctx.peek_nth(i + 1) == Some(Token::Ctrl(Ctrl::RightBracket))
            {
                i += 2;
            }

            if ctx.peek_nth(i) != Some(Token::Ctrl(Ctrl::RightParen)) {
                return false;
            }

            matches!(
                ctx.peek_nth(i + 1),
                Some(
                    Token::Ident(_)
                        | Token::Int(_)
                        | Token::Float(_)
                        | Token::Char(_)
                        | Token::String(_)
                        | Token::Ctrl(Ctrl::LeftParen | Ctrl::Not | Ctrl::Tilde)
                        | Token::KeyWord(
                            KeyWord::This
                                | KeyWord::Super
                                | KeyWord::New
                                | KeyWord::True
                                | KeyWord::False
                                | KeyWord::Null
                        )
                )
            )
        }
        _ => false,
    }
}

fn postfix_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    primary_expr(ep)
        .append(inc_dec_op().spanned().zero_or_more())
        .map(|(operand, ops)| {
            ops.into_iter().fold(operand, |expr, op| {
                let span = expr.span.join(op.span);

                Spanned::new(
                    Expr::IncDec {
                        op: op.item,
                        prefix: false,
                        expr: Box::new(expr),
                    },
                    span,
                )
            })
        })
}

fn primary_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    primary_base(ep.clone())
        .append(expr_suffix(ep).zero_or_more())
        .map(|(base, suffixes)| suffixes.into_iter().fold(base, Expr::append_suffix))
}

fn primary_base(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    literal_expr()
        .or(keyword(KeyWord::This).map(|_| Expr::This).spanned())
        .or(keyword(KeyWord::Super).map(|_| Expr::Super).spanned())
        .or(nested_expr(ep.clone()))
        .or(new_expr(ep))
        .or(symbol().map(|ident| Expr::Name(Name::simple(ident))).spanned())
}

fn literal_expr<'a>() -> Parser<'a, Spanned<Expr>> {
    Parser::new(move |ctx| {
        let literal = match ctx.peek()?.item {
            Token::Int(lexeme) => Literal::Int(lexeme),
            Token::Float(lexeme) => Literal::Float(lexeme),
            Token::Char(c) => Literal::Char(c),
            Token::String(s) => Literal::Str(s),
            Token::KeyWord(KeyWord::True) => Literal::Bool(true),
            Token::KeyWord(KeyWord::False) => Literal::Bool(false),
            Token::KeyWord(KeyWord::Null) => Literal::Null,
            _ => return None,
        };

        ctx.adv();
        Some(Expr::Literal(literal))
    })
    .spanned()
}

fn nested_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    let left_paren = ctrl(Ctrl::LeftParen);
    let right_paren = ctrl(Ctrl::RightParen).expect("Expected ')', found something else");
    let expr = ep.expect("Expected an expression, found something else");

    // the parentheses belong to the span
    expr.delimited(left_paren, right_paren)
        .spanned()
        .map(|nested| Spanned::new(nested.item.item, nested.span))
}

fn new_expr(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<Expr>> {
    let dim_expr = ep
        .clone()
        .expect("Expected array size expression")
        .delimited(
            ctrl(Ctrl::LeftBracket),
            ctrl(Ctrl::RightBracket).expect("Expected ']', found something else"),
        )
        .when(|ctx| ctx.peek_nth(1) != Some(Token::Ctrl(Ctrl::RightBracket)));
    let empty_dims = ctrl(Ctrl::LeftBracket)
        .then(ctrl(Ctrl::RightBracket))
        .zero_or_more()
        .map(|dims| dims.len());
    let array_dims = dim_expr
        .clone()
        .append(dim_expr.zero_or_more())
        .append(empty_dims)
        .map(|((first, mut rest), extra_dims)| {
            rest.insert(0, first);
            (rest, extra_dims)
        });

    let rest = array_dims
        .map(NewRest::Array)
        .or(args(ep).map(NewRest::Object));

    keyword(KeyWord::New)
        .then(
            type_base()
                .expect("Expected a type after 'new'")
                .append(rest.expect("Expected '(' or '[' after the type in 'new'")),
        )
        .map(|(ty, rest)| match rest {
            NewRest::Array((dims, extra_dims)) => Expr::NewArray {
                elem: ty,
                dims,
                extra_dims,
            },
            NewRest::Object(args) => Expr::New {
                class: match ty {
                    TypeName::Class(name) => name,
                    other => Name::simple(other.to_string()),
                },
                args,
            },
        })
        .spanned()
}

enum NewRest {
    Array((Vec<Spanned<Expr>>, usize)),
    Object(Vec<Spanned<Expr>>),
}

fn expr_suffix(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Spanned<ExprSuffix>> {
    args(ep.clone())
        .map(|args| ExprSuffix::Call { args })
        .or(index_suffix(ep))
        .or(access_suffix())
        .spanned()
}

fn access_suffix<'a>() -> Parser<'a, ExprSuffix> {
    let period = ctrl(Ctrl::Period);
    let field = symbol().expect("Expected an identifier after '.'");

    period.then(field).map(|field| ExprSuffix::Access { field })
}

fn index_suffix(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, ExprSuffix> {
    let left_bracket = ctrl(Ctrl::LeftBracket);
    let right_bracket = ctrl(Ctrl::RightBracket).expect("Expected ']', found something else");
    let expr = ep.expect("Expected an expression, found something else");

    expr.delimited(left_bracket, right_bracket)
        .map(|index| ExprSuffix::Index {
            index: Box::new(index),
        })
}

pub fn args(ep: Parser<'_, Spanned<Expr>>) -> Parser<'_, Vec<Spanned<Expr>>> {
    let left_paren = ctrl(Ctrl::LeftParen);
    let right_paren = ctrl(Ctrl::RightParen).expect("Expected ')', found something else");
    let parsed_args = ep
        .delimited_list(ctrl(Ctrl::Comma))
        .or(nothing().map(|_| vec![]));

    parsed_args.delimited(left_paren, right_paren)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;
    use pretty_assertions::assert_eq;

    fn parse_expr(input: &str) -> Result<Option<Expr>, ParseError> {
        expr().map(|e| e.item).parse_str(input)
    }

    fn int(lexeme: &str) -> Expr {
        Expr::Literal(Literal::Int(lexeme.to_string()))
    }

    fn name(ident: &str) -> Expr {
        Expr::Name(Name::simple(ident))
    }

    #[test]
    fn number_expr() {
        assert_eq!(parse_expr("09876"), Ok(Some(int("09876"))));
    }

    #[test]
    fn binop_is_left_associative() {
        match parse_expr("1 + 2 - 3") {
            Ok(Some(Expr::Binop { lhs, op, rhs })) => {
                assert_eq!(op, BinaryOp::Minus);
                assert_eq!(rhs.item, int("3"));

                match lhs.item {
                    Expr::Binop { lhs, op, rhs } => {
                        assert_eq!(lhs.item, int("1"));
                        assert_eq!(op, BinaryOp::Plus);
                        assert_eq!(rhs.item, int("2"));
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter() {
        match parse_expr("a + b * c") {
            Ok(Some(Expr::Binop { op, rhs, .. })) => {
                assert_eq!(op, BinaryOp::Plus);
                assert!(matches!(
                    rhs.item,
                    Expr::Binop {
                        op: BinaryOp::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn comparison_below_logical_and() {
        match parse_expr("a < b && c != d") {
            Ok(Some(Expr::Binop { lhs, op, rhs })) => {
                assert_eq!(op, BinaryOp::And);
                assert!(matches!(lhs.item, Expr::Binop { op: BinaryOp::Lt, .. }));
                assert!(matches!(
                    rhs.item,
                    Expr::Binop {
                        op: BinaryOp::NotEqual,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match parse_expr("a = b += 2") {
            Ok(Some(Expr::Assign { dest, op, src })) => {
                assert_eq!(dest.item, name("a"));
                assert_eq!(op, AssignOp::Assign);
                assert!(matches!(
                    src.item,
                    Expr::Assign {
                        op: AssignOp::Compound(BinaryOp::Plus),
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn indexed_expr() {
        match parse_expr("arr[i + 1]") {
            Ok(Some(Expr::ArrayAccess { array, index })) => {
                assert_eq!(array.item, name("arr"));
                assert!(matches!(index.item, Expr::Binop { op: BinaryOp::Plus, .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn qualified_method_call() {
        match parse_expr("System.out.println(x, 1)") {
            Ok(Some(Expr::Call {
                target: Some(target),
                method,
                args,
            })) => {
                assert_eq!(method, "println");
                assert_eq!(
                    target.item,
                    Expr::Name(Name(vec!["System".to_string(), "out".to_string()]))
                );
                assert_eq!(args.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn scanner_read() {
        match parse_expr("sc.nextInt()") {
            Ok(Some(Expr::Call { target, method, args })) => {
                assert_eq!(method, "nextInt");
                assert_eq!(target.map(|t| t.item), Some(name("sc")));
                assert!(args.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn new_array_and_object() {
        assert_eq!(
            parse_expr("new int[5]"),
            Ok(Some(Expr::NewArray {
                elem: TypeName::Primitive(KeyWord::Int),
                dims: vec![Spanned::new(int("5"), Span::new(8, 9))],
                extra_dims: 0,
            }))
        );

        match parse_expr("new Scanner(System.in)") {
            Ok(Some(Expr::New { class, args })) => {
                assert_eq!(class, Name::simple("Scanner"));
                assert_eq!(
                    args[0].item,
                    Expr::Name(Name(vec!["System".to_string(), "in".to_string()]))
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multi_dim_array_creation() {
        match parse_expr("new int[2][3][]") {
            Ok(Some(Expr::NewArray {
                dims, extra_dims, ..
            })) => {
                assert_eq!(dims.len(), 2);
                assert_eq!(extra_dims, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn casts_and_parens() {
        assert!(matches!(
            parse_expr("(int) x"),
            Ok(Some(Expr::Cast {
                ty: TypeName::Primitive(KeyWord::Int),
                ..
            }))
        ));
        assert!(matches!(parse_expr("(String) x"), Ok(Some(Expr::Cast { .. }))));
        assert!(matches!(
            parse_expr("(a) + b"),
            Ok(Some(Expr::Binop {
                op: BinaryOp::Plus,
                ..
            }))
        ));
    }

    #[test]
    fn pre_and_post_increment() {
        assert_eq!(
            parse_expr("i++"),
            Ok(Some(Expr::IncDec {
                op: IncDecOp::Increment,
                prefix: false,
                expr: Box::new(Spanned::new(name("i"), Span::new(0, 1))),
            }))
        );
        assert_eq!(
            parse_expr("--i"),
            Ok(Some(Expr::IncDec {
                op: IncDecOp::Decrement,
                prefix: true,
                expr: Box::new(Spanned::new(name("i"), Span::new(2, 3))),
            }))
        );
    }

    #[test]
    fn conditional_expr() {
        assert!(matches!(
            parse_expr("a > b ? a : b"),
            Ok(Some(Expr::Conditional { .. }))
        ));
    }

    #[test]
    fn unary_chain() {
        match parse_expr("-~!x") {
            Ok(Some(Expr::Unary {
                op: UnaryOp::Negate,
                expr,
            })) => {
                assert!(matches!(
                    expr.item,
                    Expr::Unary {
                        op: UnaryOp::BitNot,
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn instanceof_expr() {
        assert!(matches!(
            parse_expr("x instanceof Foo"),
            Ok(Some(Expr::InstanceOf { .. }))
        ));
    }

    #[test]
    fn expr_none() {
        assert_eq!(parse_expr(""), Ok(None));
    }

    #[test]
    fn dangling_binop_is_an_error() {
        assert!(parse_expr("1 + ").is_err());
    }

    #[test]
    fn spans_cover_the_expression() {
        let result = expr().parse_str("  a * (b + 1)").unwrap().unwrap();

        assert_eq!(result.span, Span::new(2, 13));
    }

    #[test]
    fn array_initializer() {
        let result = var_init().map(|e| e.item).parse_str("{1, 2, {3},}");

        match result {
            Ok(Some(Expr::ArrayInit(items))) => assert_eq!(items.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }
}
