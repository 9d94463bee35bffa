use super::expr::{var_init, Expr, Name};
use super::spanned::Spanned;
use super::stmt::{stmt, Block};
use super::token::{Ctrl, KeyWord, Token};
use super::{block, ctrl, keyword, modifier, nothing, symbol, ParseContext, Parser};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package: Option<Spanned<Name>>,
    pub imports: Vec<Spanned<Import>>,
    pub classes: Vec<Spanned<ClassDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub name: Name,
    pub on_demand: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: Vec<KeyWord>,
    pub name: String,
    pub superclass: Option<Name>,
    pub members: Vec<Spanned<Member>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field {
        modifiers: Vec<KeyWord>,
        ty: Spanned<TypeName>,
        declarators: Vec<Spanned<VarDeclarator>>,
    },
    Method(MethodDecl),
    StaticInit(Block),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub kind: MethodKind,
    pub modifiers: Vec<KeyWord>,
    /// `None` for `void` methods and constructors.
    pub ret: Option<TypeName>,
    pub name: String,
    pub params: Vec<Spanned<Param>>,
    pub throws: Vec<Name>,
    /// `None` for a body-less declaration ending in `;`.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    /// Brackets written after the name, as in `int x[]`.
    pub dims: usize,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    Primitive(KeyWord),
    Class(Name),
    Array(Box<TypeName>),
}

impl TypeName {
    pub fn with_dims(self, dims: usize) -> TypeName {
        (0..dims).fold(self, |ty, _| TypeName::Array(Box::new(ty)))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Primitive(keyword) => {
                write!(f, "{}", format!("{:?}", keyword).to_lowercase())
            }
            TypeName::Class(name) => write!(f, "{}", name),
            TypeName::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

struct MethodTail {
    name: String,
    params: Vec<Spanned<Param>>,
    dims: usize,
    throws: Vec<Name>,
    body: Option<Block>,
}

enum MemberTail {
    Method(MethodTail),
    Field(Vec<Spanned<VarDeclarator>>),
}

pub fn compilation_unit<'a>() -> Parser<'a, CompilationUnit> {
    let package = keyword(KeyWord::Package)
        .then(qualified_name().spanned().expect("Expected a package name"))
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after package declaration"))
        .optional();

    let import = keyword(KeyWord::Import)
        .then(qualified_name().expect("Expected a name after 'import'"))
        // a trailing '.' was consumed by the name list
        .append(ctrl(Ctrl::Multiply).optional())
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after import"))
        .map(|(name, star)| Import {
            name,
            on_demand: star.is_some(),
        })
        .spanned();

    package
        .append(import.zero_or_more())
        .append(class_decl().zero_or_more())
        .map(|((package, imports), classes)| CompilationUnit {
            package,
            imports,
            classes,
        })
}

fn class_decl<'a>() -> Parser<'a, Spanned<ClassDecl>> {
    let superclass = keyword(KeyWord::Extends)
        .then(qualified_name().expect("Expected a class name after 'extends'"))
        .optional();
    let members = member()
        .recover(Ctrl::SemiColon)
        .zero_or_more()
        .delimited(
            ctrl(Ctrl::LeftCurly).expect("Expected '{' to open the class body"),
            ctrl(Ctrl::RightCurly).expect("Expected '}', found something else"),
        );

    modifier()
        .zero_or_more()
        .closed_by(keyword(KeyWord::Class))
        .append(symbol().expect("Expected class name after 'class'"))
        .append(superclass)
        .append(members)
        .map(|(((modifiers, name), superclass), members)| ClassDecl {
            modifiers,
            name,
            superclass,
            members,
        })
        .spanned()
}

fn member<'a>() -> Parser<'a, Spanned<Member>> {
    let static_init = keyword(KeyWord::Static)
        .then(block(stmt()))
        .map(Member::StaticInit)
        .when(|ctx| ctx.peek_nth(1) == Some(Token::Ctrl(Ctrl::LeftCurly)));

    let constructor = modifier()
        .zero_or_more()
        .append(method_tail().when(is_method_start))
        .map(|(modifiers, tail)| method_from_tail(MethodKind::Constructor, modifiers, None, tail));

    let void_method = modifier()
        .zero_or_more()
        .closed_by(keyword(KeyWord::Void))
        .append(
            method_tail()
                .when(is_method_start)
                .expect("Expected a method name after 'void'"),
        )
        .map(|(modifiers, tail)| method_from_tail(MethodKind::Method, modifiers, None, tail));

    let field_tail = declarator()
        .delimited_list(ctrl(Ctrl::Comma))
        .closed_by(ctrl(Ctrl::SemiColon).expect("Expected ';' after field declaration"))
        .map(MemberTail::Field);

    let typed_member = modifier()
        .zero_or_more()
        .append(type_name().spanned())
        .append(
            method_tail()
                .when(is_method_start)
                .map(MemberTail::Method)
                .or(field_tail)
                .expect("Expected a member name after the type"),
        )
        .map(|((modifiers, ty), tail)| match tail {
            MemberTail::Field(declarators) => Member::Field {
                modifiers,
                ty,
                declarators,
            },
            MemberTail::Method(tail) => {
                method_from_tail(MethodKind::Method, modifiers, Some(ty.item), tail)
            }
        });

    static_init
        .or(constructor.when(is_constructor_start))
        .or(void_method.when(is_void_method_start))
        .or(typed_member)
        .spanned()
}

fn method_from_tail(
    kind: MethodKind,
    modifiers: Vec<KeyWord>,
    ret: Option<TypeName>,
    tail: MethodTail,
) -> Member {
    Member::Method(MethodDecl {
        kind,
        modifiers,
        ret: ret.map(|ty| ty.with_dims(tail.dims)),
        name: tail.name,
        params: tail.params,
        throws: tail.throws,
        body: tail.body,
    })
}

fn method_tail<'a>() -> Parser<'a, MethodTail> {
    let params = param()
        .delimited_list(ctrl(Ctrl::Comma))
        .or(nothing().map(|_| vec![]))
        .delimited(
            ctrl(Ctrl::LeftParen),
            ctrl(Ctrl::RightParen).expect("Expected ')' to close the parameter list"),
        );
    let throws = keyword(KeyWord::Throws)
        .then(
            qualified_name()
                .delimited_list(ctrl(Ctrl::Comma))
                .expect("Expected an exception type after 'throws'"),
        )
        .or(nothing().map(|_| vec![]));
    let body = block(stmt())
        .map(Some)
        .or(ctrl(Ctrl::SemiColon).map(|_| None))
        .expect("Expected a method body");

    symbol()
        .append(params)
        .append(dims())
        .append(throws)
        .append(body)
        .map(|((((name, params), dims), throws), body)| MethodTail {
            name,
            params,
            dims,
            throws,
            body,
        })
}

fn is_method_start(ctx: &mut ParseContext<'_>) -> bool {
    matches!(ctx.peek_nth(0), Some(Token::Ident(_)))
        && ctx.peek_nth(1) == Some(Token::Ctrl(Ctrl::LeftParen))
}

// modifiers followed by `Name (`
fn is_constructor_start(ctx: &mut ParseContext<'_>) -> bool {
    let mut i = 0;

    while matches!(ctx.peek_nth(i), Some(Token::KeyWord(k)) if k.is_modifier()) {
        i += 1;
    }

    matches!(ctx.peek_nth(i), Some(Token::Ident(_)))
        && ctx.peek_nth(i + 1) == Some(Token::Ctrl(Ctrl::LeftParen))
}

fn is_void_method_start(ctx: &mut ParseContext<'_>) -> bool {
    let mut i = 0;

    while matches!(ctx.peek_nth(i), Some(Token::KeyWord(k)) if k.is_modifier()) {
        i += 1;
    }

    ctx.peek_nth(i) == Some(Token::KeyWord(KeyWord::Void))
}

pub(super) fn param<'a>() -> Parser<'a, Spanned<Param>> {
    keyword(KeyWord::Final)
        .optional()
        .then(type_name())
        .append(symbol().expect("Expected a parameter name"))
        .append(dims())
        .map(|((ty, name), dims)| Param {
            ty: ty.with_dims(dims),
            name,
        })
        .spanned()
}

pub(super) fn declarator<'a>() -> Parser<'a, Spanned<VarDeclarator>> {
    let init = ctrl(Ctrl::Equal)
        .then(var_init().expect("Expected an initializer after '='"))
        .optional();

    symbol()
        .append(dims())
        .append(init)
        .map(|((name, dims), init)| VarDeclarator { name, dims, init })
        .spanned()
}

pub(super) fn qualified_name<'a>() -> Parser<'a, Name> {
    symbol().delimited_list(ctrl(Ctrl::Period)).map(Name)
}

/// A primitive keyword or a possibly qualified class name, without brackets.
pub(super) fn type_base<'a>() -> Parser<'a, TypeName> {
    let primitive = Parser::new(|ctx| match ctx.peek()?.item {
        Token::KeyWord(keyword) if keyword.is_primitive_type() => {
            ctx.adv();
            Some(TypeName::Primitive(keyword))
        }
        _ => None,
    });

    primitive.or(qualified_name().map(TypeName::Class))
}

pub(super) fn type_name<'a>() -> Parser<'a, TypeName> {
    type_base()
        .append(dims())
        .map(|(ty, dims)| ty.with_dims(dims))
}

fn dims<'a>() -> Parser<'a, usize> {
    ctrl(Ctrl::LeftBracket)
        .then(ctrl(Ctrl::RightBracket).expect("Expected ']', found something else"))
        .zero_or_more()
        .map(|dims| dims.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::stmt::Stmt;
    use crate::parser::ParseError;
    use pretty_assertions::assert_eq;

    fn parse_unit(input: &str) -> Result<CompilationUnit, ParseError> {
        compilation_unit().parse_str(input).map(|unit| unit.unwrap())
    }

    fn single_class(input: &str) -> ClassDecl {
        let mut unit = parse_unit(input).unwrap();

        assert_eq!(unit.classes.len(), 1);
        unit.classes.remove(0).item
    }

    #[test]
    fn package_and_imports() {
        let unit = parse_unit("package a.b; import java.util.Scanner; import java.io.*; class A {}")
            .unwrap();

        assert_eq!(
            unit.package.map(|p| p.item),
            Some(Name(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(unit.imports.len(), 2);
        assert!(!unit.imports[0].item.on_demand);
        assert!(unit.imports[1].item.on_demand);
        assert_eq!(unit.imports[1].item.name, Name(vec!["java".to_string(), "io".to_string()]));
    }

    #[test]
    fn class_with_members() {
        let class = single_class(
            r#"public class Main extends Base {
                static int count = 0, total;
                int[] values;
                static { count = 1; }
                Main(int x) { }
                public static void main(String[] args) throws Exception { }
                int get();
            }"#,
        );

        assert_eq!(class.name, "Main");
        assert_eq!(class.modifiers, vec![KeyWord::Public]);
        assert_eq!(class.superclass, Some(Name::simple("Base")));
        assert_eq!(class.members.len(), 6);

        match &class.members[0].item {
            Member::Field {
                modifiers,
                ty,
                declarators,
            } => {
                assert_eq!(modifiers, &vec![KeyWord::Static]);
                assert_eq!(ty.item, TypeName::Primitive(KeyWord::Int));
                assert_eq!(declarators.len(), 2);
                assert!(declarators[0].item.init.is_some());
                assert!(declarators[1].item.init.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        match &class.members[1].item {
            Member::Field { ty, .. } => {
                assert_eq!(
                    ty.item,
                    TypeName::Array(Box::new(TypeName::Primitive(KeyWord::Int)))
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(class.members[2].item, Member::StaticInit(_)));

        match &class.members[3].item {
            Member::Method(method) => {
                assert_eq!(method.kind, MethodKind::Constructor);
                assert_eq!(method.name, "Main");
                assert_eq!(method.params.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }

        match &class.members[4].item {
            Member::Method(method) => {
                assert_eq!(method.kind, MethodKind::Method);
                assert_eq!(method.ret, None);
                assert_eq!(method.name, "main");
                assert_eq!(
                    method.params[0].item.ty,
                    TypeName::Array(Box::new(TypeName::Class(Name::simple("String"))))
                );
                assert_eq!(method.throws, vec![Name::simple("Exception")]);
                assert_eq!(method.body, Some(vec![]));
            }
            other => panic!("unexpected {:?}", other),
        }

        match &class.members[5].item {
            Member::Method(method) => {
                assert_eq!(method.ret, Some(TypeName::Primitive(KeyWord::Int)));
                assert_eq!(method.body, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn declarator_brackets_after_name() {
        let class = single_class("class A { void f() { int x[] = new int[5]; } }");

        let Member::Method(method) = &class.members[0].item else {
            panic!("expected a method");
        };
        let body = method.body.as_ref().unwrap();

        match &body[0].item {
            Stmt::LocalVar { ty, declarators } => {
                assert_eq!(ty.item, TypeName::Primitive(KeyWord::Int));
                assert_eq!(declarators[0].item.name, "x");
                assert_eq!(declarators[0].item.dims, 1);
                assert!(matches!(
                    declarators[0].item.init.as_ref().map(|e| &e.item),
                    Some(Expr::NewArray { .. })
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn type_names_display_like_source() {
        let ty = TypeName::Class(Name::simple("String")).with_dims(2);

        assert_eq!(ty.to_string(), "String[][]");
        assert_eq!(TypeName::Primitive(KeyWord::Boolean).to_string(), "boolean");
    }

    #[test]
    fn missing_class_body_is_an_error() {
        assert!(parse_unit("class A").is_err());
    }
}
