use super::decl::{declarator, param, type_name, Param, TypeName, VarDeclarator};
use super::expr::{expr, Expr};
use super::spanned::Spanned;
use super::token::{Ctrl, KeyWord, Token};
use super::{block, ctrl, keyword, nothing, recursive, symbol, ParseContext, Parser};

pub type Block = Vec<Spanned<Stmt>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    LocalVar {
        ty: Spanned<TypeName>,
        declarators: Vec<Spanned<VarDeclarator>>,
    },
    Block(Block),
    Empty,
    Labeled {
        label: String,
        stmt: Box<Spanned<Stmt>>,
    },
    Expr(Spanned<Expr>),
    If {
        cond: Spanned<Expr>,
        then: Box<Spanned<Stmt>>,
        otherwise: Option<Box<Spanned<Stmt>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        cond: Spanned<Expr>,
    },
    For {
        init: Vec<Spanned<Stmt>>,
        cond: Option<Spanned<Expr>>,
        update: Vec<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    Switch {
        scrutinee: Spanned<Expr>,
        groups: Vec<SwitchGroup>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Return(Option<Spanned<Expr>>),
    Throw(Spanned<Expr>),
    Try {
        block: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchGroup {
    pub labels: Vec<Spanned<SwitchLabel>>,
    pub stmts: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchLabel {
    Case(Spanned<Expr>),
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Spanned<Param>,
    pub block: Block,
}

pub fn stmt<'a>() -> Parser<'a, Spanned<Stmt>> {
    recursive(|sp| {
        block(sp.clone())
            .map(Stmt::Block)
            .spanned()
            .or(local_var_stmt().when(looks_like_local_decl))
            .or(labeled_stmt(sp.clone()).when(is_label))
            .or(if_stmt(sp.clone()))
            .or(while_stmt(sp.clone()))
            .or(do_stmt(sp.clone()))
            .or(for_stmt(sp.clone()))
            .or(switch_stmt(sp.clone()))
            .or(try_stmt(sp))
            .or(closed_stmt())
            .or(ctrl(Ctrl::SemiColon).map(|_| Stmt::Empty).spanned())
    })
}

// a type followed by an identifier starts a declaration, `a[i] = ..` and
// `a.b(..)` do not
fn looks_like_local_decl(ctx: &mut ParseContext<'_>) -> bool {
    match ctx.peek_nth(0) {
        Some(Token::KeyWord(KeyWord::Final)) => true,
        Some(Token::KeyWord(keyword)) => keyword.is_primitive_type(),
        Some(Token::Ident(_)) => {
            let mut i = 1;

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

            matches!(ctx.peek_nth(i), Some(Token::Ident(_)))
        }
        _ => false,
    }
}

fn is_label(ctx: &mut ParseContext<'_>) -> bool {
    matches!(ctx.peek_nth(0), Some(Token::Ident(_)))
        && ctx.peek_nth(1) == Some(Token::Ctrl(Ctrl::Colon))
}

fn local_var_decl<'a>() -> Parser<'a, Stmt> {
    keyword(KeyWord::Final)
        .optional()
        .then(type_name().spanned())
        .append(
            declarator()
                .delimited_list(ctrl(Ctrl::Comma))
                .expect("Expected a variable name after the type"),
        )
        .map(|(ty, declarators)| Stmt::LocalVar { ty, declarators })
}

fn local_var_stmt<'a>() -> Parser<'a, Spanned<Stmt>> {
    local_var_decl()
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after variable declaration"))
        .spanned()
}

fn labeled_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    symbol()
        .closed_by(ctrl(Ctrl::Colon))
        .append(sp.expect("Expected a statement after the label"))
        .map(|(label, stmt)| Stmt::Labeled {
            label,
            stmt: Box::new(stmt),
        })
        .spanned()
}

fn paren_cond<'a>(after: &'static str) -> Parser<'a, Spanned<Expr>> {
    expr()
        .expect("Expected a condition")
        .delimited(
            ctrl(Ctrl::LeftParen).expect(after),
            ctrl(Ctrl::RightParen).expect("Expected ')' after the condition"),
        )
}

fn if_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    let else_branch =
        keyword(KeyWord::Else).then(sp.clone().expect("Expected a statement after 'else'"));

    keyword(KeyWord::If)
        .then(paren_cond("Expected '(' after 'if'"))
        .append(sp.expect("Expected a statement after the if condition"))
        .append(else_branch.optional())
        .map(|((cond, then), otherwise)| Stmt::If {
            cond,
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        })
        .spanned()
}

fn while_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    keyword(KeyWord::While)
        .then(paren_cond("Expected '(' after 'while'"))
        .append(sp.expect("Expected a statement after the while condition"))
        .map(|(cond, body)| Stmt::While {
            cond,
            body: Box::new(body),
        })
        .spanned()
}

fn do_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    keyword(KeyWord::Do)
        .then(sp.expect("Expected a statement after 'do'"))
        .append(
            keyword(KeyWord::While)
                .expect("Expected 'while' after the do body")
                .then(paren_cond("Expected '(' after 'while'")),
        )
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after do-while"))
        .map(|(body, cond)| Stmt::DoWhile {
            body: Box::new(body),
            cond,
        })
        .spanned()
}

fn for_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    let init_decl = local_var_decl()
        .spanned()
        .when(looks_like_local_decl)
        .map(|decl| vec![decl]);
    let init_exprs = expr()
        .delimited_list(ctrl(Ctrl::Comma))
        .map(|exprs| {
            exprs
                .into_iter()
                .map(|e| {
                    let span = e.span;
                    Spanned::new(Stmt::Expr(e), span)
                })
                .collect::<Vec<_>>()
        });
    let init = init_decl.or(init_exprs).or(nothing().map(|_| vec![]));
    let update = expr()
        .delimited_list(ctrl(Ctrl::Comma))
        .or(nothing().map(|_| vec![]));

    keyword(KeyWord::For)
        .then(ctrl(Ctrl::LeftParen).expect("Expected '(' after 'for'"))
        .then(init)
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after the for initializer"))
        .append(expr().optional())
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after the for condition"))
        .append(update)
        .closed_by(ctrl(Ctrl::RightParen).expect("Expected ')' after the for update"))
        .append(sp.expect("Expected a statement after the for header"))
        .map(|(((init, cond), update), body)| Stmt::For {
            init,
            cond,
            update,
            body: Box::new(body),
        })
        .spanned()
}

fn switch_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    let case = keyword(KeyWord::Case)
        .then(expr().expect("Expected a constant after 'case'"))
        .closed_by(ctrl(Ctrl::Colon).expect("Expected ':' after the case constant"))
        .map(SwitchLabel::Case);
    let default = keyword(KeyWord::Default)
        .then(ctrl(Ctrl::Colon).expect("Expected ':' after 'default'"))
        .map(|_| SwitchLabel::Default);
    let label = case.or(default).spanned();

    let group = label
        .clone()
        .append(label.zero_or_more())
        .append(sp.zero_or_more())
        .map(|((first, mut labels), stmts)| {
            labels.insert(0, first);
            SwitchGroup { labels, stmts }
        });

    keyword(KeyWord::Switch)
        .then(paren_cond("Expected '(' after 'switch'"))
        .append(group.zero_or_more().delimited(
            ctrl(Ctrl::LeftCurly).expect("Expected '{' to open the switch body"),
            ctrl(Ctrl::RightCurly).expect("Expected '}', found something else"),
        ))
        .map(|(scrutinee, groups)| Stmt::Switch { scrutinee, groups })
        .spanned()
}

fn try_stmt(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Spanned<Stmt>> {
    let catch = keyword(KeyWord::Catch)
        .then(param().expect("Expected a catch parameter").delimited(
            ctrl(Ctrl::LeftParen).expect("Expected '(' after 'catch'"),
            ctrl(Ctrl::RightParen).expect("Expected ')' after the catch parameter"),
        ))
        .append(block(sp.clone()).expect("Expected a block after the catch clause"))
        .map(|(param, block)| CatchClause { param, block });
    let finally = keyword(KeyWord::Finally)
        .then(block(sp.clone()).expect("Expected a block after 'finally'"));

    keyword(KeyWord::Try)
        .then(block(sp).expect("Expected a block after 'try'"))
        .append(catch.zero_or_more())
        .append(finally.optional())
        .map(|((block, catches), finally)| Stmt::Try {
            block,
            catches,
            finally,
        })
        .spanned()
}

fn closed_stmt<'a>() -> Parser<'a, Spanned<Stmt>> {
    return_stmt()
        .or(break_stmt())
        .or(continue_stmt())
        .or(throw_stmt())
        .or(expr().map(Stmt::Expr))
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' at end of statement"))
        .spanned()
}

fn return_stmt<'a>() -> Parser<'a, Stmt> {
    keyword(KeyWord::Return)
        .then(expr().optional())
        .map(Stmt::Return)
}

fn break_stmt<'a>() -> Parser<'a, Stmt> {
    keyword(KeyWord::Break)
        .then(symbol().optional())
        .map(Stmt::Break)
}

fn continue_stmt<'a>() -> Parser<'a, Stmt> {
    keyword(KeyWord::Continue)
        .then(symbol().optional())
        .map(Stmt::Continue)
}

fn throw_stmt<'a>() -> Parser<'a, Stmt> {
    keyword(KeyWord::Throw)
        .then(expr().expect("Expected an expression after 'throw'"))
        .map(Stmt::Throw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::BinaryOp;
    use crate::parser::{Name, ParseError};
    use pretty_assertions::assert_eq;

    fn parse_stmt(input: &str) -> Result<Option<Stmt>, ParseError> {
        stmt().map(|s| s.item).parse_str(input)
    }

    #[test]
    fn expr_stmt() {
        match parse_stmt("x = 555;") {
            Ok(Some(Stmt::Expr(e))) => assert!(matches!(e.item, Expr::Assign { .. })),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn local_declarations() {
        match parse_stmt("int a = 1, b;") {
            Ok(Some(Stmt::LocalVar { declarators, .. })) => assert_eq!(declarators.len(), 2),
            other => panic!("unexpected {:?}", other),
        }

        match parse_stmt("Scanner sc = new Scanner(System.in);") {
            Ok(Some(Stmt::LocalVar { ty, .. })) => {
                assert_eq!(ty.item, TypeName::Class(Name::simple("Scanner")))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn array_store_is_not_a_declaration() {
        assert!(matches!(parse_stmt("a[0] = 1;"), Ok(Some(Stmt::Expr(_)))));
        assert!(matches!(parse_stmt("a.b(1);"), Ok(Some(Stmt::Expr(_)))));
    }

    #[test]
    fn dangling_else_binds_to_inner_if() {
        match parse_stmt("if (a) if (b) x = 1; else x = 2;") {
            Ok(Some(Stmt::If {
                then, otherwise, ..
            })) => {
                assert!(otherwise.is_none());
                assert!(matches!(
                    then.item,
                    Stmt::If {
                        otherwise: Some(_),
                        ..
                    }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn loops() {
        assert!(matches!(
            parse_stmt("while (i < 10) { i++; }"),
            Ok(Some(Stmt::While { .. }))
        ));
        assert!(matches!(
            parse_stmt("do i--; while (i > 0);"),
            Ok(Some(Stmt::DoWhile { .. }))
        ));

        match parse_stmt("for (int i = 0; i < n; i++, j--) sum += i;") {
            Ok(Some(Stmt::For {
                init, cond, update, ..
            })) => {
                assert_eq!(init.len(), 1);
                assert!(matches!(
                    cond.map(|c| c.item),
                    Some(Expr::Binop {
                        op: BinaryOp::Lt,
                        ..
                    })
                ));
                assert_eq!(update.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        match parse_stmt("for (;;) break;") {
            Ok(Some(Stmt::For {
                init, cond, update, ..
            })) => {
                assert!(init.is_empty());
                assert!(cond.is_none());
                assert!(update.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn switch_groups() {
        let source = "switch (x) { case 1: case 2: y = 1; break; default: y = 0; }";

        match parse_stmt(source) {
            Ok(Some(Stmt::Switch { groups, .. })) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].labels.len(), 2);
                assert_eq!(groups[0].stmts.len(), 2);
                assert_eq!(groups[1].labels[0].item, SwitchLabel::Default);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn try_catch_finally() {
        let source = "try { a(); } catch (Exception e) { } finally { b(); }";

        match parse_stmt(source) {
            Ok(Some(Stmt::Try {
                block,
                catches,
                finally,
            })) => {
                assert_eq!(block.len(), 1);
                assert_eq!(catches[0].param.item.name, "e");
                assert_eq!(finally.map(|f| f.len()), Some(1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn labeled_break_and_continue() {
        match parse_stmt("outer: while (true) { continue outer; }") {
            Ok(Some(Stmt::Labeled { label, stmt })) => {
                assert_eq!(label, "outer");
                assert!(matches!(stmt.item, Stmt::While { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(parse_stmt("break;"), Ok(Some(Stmt::Break(None))));
    }

    #[test]
    fn missing_semicolon() {
        assert!(parse_stmt("x = 1").is_err());
    }

    #[test]
    fn empty_and_return() {
        assert_eq!(parse_stmt(";"), Ok(Some(Stmt::Empty)));
        assert_eq!(parse_stmt("return;"), Ok(Some(Stmt::Return(None))));
    }
}
