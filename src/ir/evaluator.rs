use super::control_flow::ControlFlow;
use super::emitter::Emitter;
use super::error::{Diagnostic, SemanticError};
use super::symbol_table::SymbolTable;
use super::tac::{Label, Tac};
use super::value::{Place, Type, Value};
use crate::op::Comparison;
use crate::parser::{
    Block, CatchClause, ClassDecl, CompilationUnit, Expr, Member, MethodDecl, MethodKind, Param,
    Span, Spanned, Stmt, SwitchGroup, SwitchLabel, TypeName, VarDeclarator,
};
use tracing::{debug, trace};

/// Everything one compilation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredProgram {
    pub instrs: Vec<Tac>,
    pub diagnostics: Vec<Diagnostic>,
    /// Reduced productions in post-order, ending with `Goal`.
    pub trace: Vec<&'static str>,
}

/// Post-order walk over the AST that type checks each node and emits its
/// three-address code. All state of one compilation lives here.
#[derive(Debug, Default)]
pub struct Evaluator {
    pub(super) symbols: SymbolTable,
    pub(super) emitter: Emitter,
    pub(super) flow: ControlFlow,
    pub(super) trace: Vec<&'static str>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> LoweredProgram {
        let (instrs, diagnostics) = self.emitter.into_parts();

        LoweredProgram {
            instrs,
            diagnostics,
            trace: self.trace,
        }
    }

    pub fn generate_unit(&mut self, unit: &CompilationUnit) {
        if unit.package.is_some() {
            self.reduce("PackageDeclaration");
        }

        for _ in unit.imports.iter() {
            self.reduce("ImportDeclaration");
        }

        for class in unit.classes.iter() {
            self.generate_class(&class.item);
        }

        self.reduce("CompilationUnit");
        self.reduce("Goal");
    }

    fn generate_class(&mut self, class: &ClassDecl) {
        debug!(class = %class.name, "lowering class");

        for member in class.members.iter() {
            match &member.item {
                Member::Field { ty, declarators, .. } => {
                    for declarator in declarators.iter() {
                        self.generate_declarator(&ty.item, declarator);
                    }
                    self.reduce("FieldDeclaration");
                }
                Member::Method(method) => self.generate_method(method),
                Member::StaticInit(block) => {
                    self.generate_block(block);
                    self.reduce("StaticInitializer");
                }
            }
        }

        self.reduce("ClassDeclaration");
    }

    fn generate_method(&mut self, method: &MethodDecl) {
        for param in method.params.iter() {
            self.generate_param(param);
        }

        let production = match method.kind {
            MethodKind::Method => "MethodDeclaration",
            MethodKind::Constructor => "ConstructorDeclaration",
        };

        let body = match &method.body {
            Some(body) => body,
            None => {
                self.reduce(production);
                return;
            }
        };

        trace!(method = %method.name, "entering method body");

        let begin = self.new_label();
        let end = self.new_label();

        self.emit(Tac::Func { name: method.name.clone() });
        self.emit(Tac::CallLabel { name: method.name.clone() });
        self.flow.push(Some(begin.clone()), end.clone());
        self.emit_label(begin);
        self.generate_block(body);
        self.emit_label(end);
        self.emit(Tac::Ret);
        self.flow.pop();

        self.reduce(production);
    }

    fn generate_param(&mut self, param: &Spanned<Param>) {
        let ty = Type::from_type_name(&param.item.ty);

        if let Err(err) = self.symbols.declare_param(&param.item.name, ty) {
            self.error(err, param.span);
        }

        self.reduce("FormalParameter");
    }

    pub(super) fn generate_declarator(
        &mut self,
        ty: &TypeName,
        declarator: &Spanned<VarDeclarator>,
    ) {
        let VarDeclarator { name, dims, init } = &declarator.item;
        let ty = Type::from_type_name(&ty.clone().with_dims(*dims));
        let init = init.as_ref().map(|init| (self.generate_expr(init), init.span));

        if let Err(err) = self.symbols.declare(name, ty.clone()) {
            self.error(err, declarator.span);
        }

        if let Some((value, span)) = init {
            let dest = Value::scalar(name.clone(), ty);

            self.generate_simple_assign(dest, value, span);
        }

        self.reduce("VariableDeclarator");
    }

    pub fn generate_stmt(&mut self, stmt: &Spanned<Stmt>) {
        let span = stmt.span;

        match &stmt.item {
            Stmt::LocalVar { ty, declarators } => {
                for declarator in declarators.iter() {
                    self.generate_declarator(&ty.item, declarator);
                }
                self.reduce("LocalVariableDeclarationStatement");
            }
            Stmt::Block(block) => self.generate_block(block),
            Stmt::Empty => self.reduce("EmptyStatement"),
            Stmt::Labeled { stmt, .. } => {
                self.generate_stmt(stmt);
                self.reduce("LabeledStatement");
            }
            Stmt::Expr(expr) => {
                self.generate_expr(expr);
                self.reduce("ExpressionStatement");
            }
            Stmt::If { cond, then, otherwise: None } => self.generate_if_block(cond, then),
            Stmt::If { cond, then, otherwise: Some(otherwise) } => {
                self.generate_if_else_block(cond, then, otherwise)
            }
            Stmt::While { cond, body } => self.generate_while_block(cond, body),
            Stmt::DoWhile { body, cond } => self.generate_do_block(body, cond),
            Stmt::For { init, cond, update, body } => {
                self.generate_for_block(init, cond.as_ref(), update, body)
            }
            Stmt::Switch { scrutinee, groups } => self.generate_switch(scrutinee, groups),
            Stmt::Break(_) => self.generate_break(span),
            Stmt::Continue(_) => self.generate_continue(span),
            Stmt::Return(expr) => self.generate_return(expr.as_ref()),
            Stmt::Throw(expr) => {
                self.generate_expr(expr);
                self.reduce("ThrowStatement");
            }
            Stmt::Try { block, catches, finally } => {
                self.generate_try(block, catches, finally.as_ref())
            }
        }
    }

    fn generate_block(&mut self, block: &Block) {
        for stmt in block.iter() {
            self.generate_stmt(stmt);
        }

        self.reduce("Block");
    }

    fn generate_if_block(&mut self, cond: &Spanned<Expr>, then: &Spanned<Stmt>) {
        let cond = self.generate_condition(cond);
        let end = self.new_label();

        self.emit_branch_unless(cond, &end);
        self.generate_stmt(then);
        self.emit_label(end);

        self.reduce("IfThenStatement");
    }

    fn generate_if_else_block(
        &mut self,
        cond: &Spanned<Expr>,
        then: &Spanned<Stmt>,
        otherwise: &Spanned<Stmt>,
    ) {
        let cond = self.generate_condition(cond);
        let else_start = self.new_label();
        let else_end = self.new_label();

        self.emit_branch_unless(cond, &else_start);
        self.generate_stmt(then);
        self.emit_jump(else_end.clone());
        self.emit_label(else_start);
        self.generate_stmt(otherwise);
        self.emit_label(else_end);

        self.reduce("IfThenElseStatement");
    }

    fn generate_while_block(&mut self, cond: &Spanned<Expr>, body: &Spanned<Stmt>) {
        let start = self.new_label();
        let end = self.new_label();

        self.emit_label(start.clone());

        let cond = self.generate_condition(cond);

        self.emit_branch_unless(cond, &end);
        self.generate_loop_body(body, Some(start.clone()), end.clone());
        self.emit_jump(start);
        self.emit_label(end);

        self.reduce("WhileStatement");
    }

    fn generate_do_block(&mut self, body: &Spanned<Stmt>, cond: &Spanned<Expr>) {
        let start = self.new_label();
        let cond_start = self.new_label();
        let end = self.new_label();

        self.emit_label(start.clone());
        self.generate_loop_body(body, Some(cond_start.clone()), end.clone());
        self.emit_label(cond_start);

        let cond = self.generate_condition(cond);

        self.emit_branch_unless(cond, &end);
        self.emit_jump(start);
        self.emit_label(end);

        self.reduce("DoStatement");
    }

    fn generate_for_block(
        &mut self,
        init: &[Spanned<Stmt>],
        cond: Option<&Spanned<Expr>>,
        update: &[Spanned<Expr>],
        body: &Spanned<Stmt>,
    ) {
        for stmt in init.iter() {
            self.generate_stmt(stmt);
        }

        let start = self.new_label();
        let update_start = self.new_label();
        let end = self.new_label();

        self.emit_label(start.clone());

        if let Some(cond) = cond {
            let cond = self.generate_condition(cond);

            self.emit_branch_unless(cond, &end);
        }

        self.generate_loop_body(body, Some(update_start.clone()), end.clone());
        self.emit_label(update_start);

        for expr in update.iter() {
            self.generate_expr(expr);
        }

        self.emit_jump(start);
        self.emit_label(end);

        self.reduce("ForStatement");
    }

    fn generate_loop_body(&mut self, body: &Spanned<Stmt>, begin: Option<Label>, end: Label) {
        self.flow.push(begin, end);
        self.generate_stmt(body);
        self.flow.pop();
    }

    fn generate_switch(&mut self, scrutinee: &Spanned<Expr>, groups: &[SwitchGroup]) {
        let value = self.generate_expr(scrutinee);
        let subject = self.usable_operand(value, scrutinee.span, SemanticError::InvalidOperand);
        let end = self.new_label();
        let group_labels: Vec<Label> = groups.iter().map(|_| self.new_label()).collect();
        let mut default = None;

        for (group, label) in groups.iter().zip(group_labels.iter()) {
            for case in group.labels.iter() {
                match &case.item {
                    SwitchLabel::Default => default = Some(label.clone()),
                    SwitchLabel::Case(expr) => {
                        let value = self.generate_expr(expr);
                        let case_place =
                            self.usable_operand(value, expr.span, SemanticError::InvalidOperand);

                        if let (Some(lhs), Some(rhs)) = (subject.clone(), case_place) {
                            self.emit(Tac::IfGoto {
                                lhs,
                                cmp: Comparison::Eq,
                                rhs,
                                label: label.clone(),
                            });
                        }
                    }
                }
            }
        }

        self.emit_jump(default.unwrap_or_else(|| end.clone()));

        let outer = self.flow.continue_target().cloned();

        self.flow.push(outer, end.clone());

        for (group, label) in groups.iter().zip(group_labels.into_iter()) {
            self.emit_label(label);

            for stmt in group.stmts.iter() {
                self.generate_stmt(stmt);
            }
        }

        self.flow.pop();
        self.emit_label(end);

        self.reduce("SwitchStatement");
    }

    fn generate_break(&mut self, span: Span) {
        match self.flow.break_target().cloned() {
            Some(label) => self.emit_jump(label),
            None => self.error(SemanticError::BreakOutsideLoop, span),
        }

        self.reduce("BreakStatement");
    }

    fn generate_continue(&mut self, span: Span) {
        match self.flow.continue_target().cloned() {
            Some(label) => self.emit_jump(label),
            None => self.error(SemanticError::ContinueOutsideLoop, span),
        }

        self.reduce("ContinueStatement");
    }

    fn generate_return(&mut self, expr: Option<&Spanned<Expr>>) {
        if let Some(expr) = expr {
            self.generate_expr(expr);
        }

        self.emit(Tac::Ret);

        self.reduce("ReturnStatement");
    }

    fn generate_try(&mut self, block: &Block, catches: &[CatchClause], finally: Option<&Block>) {
        self.generate_block(block);

        if !catches.is_empty() {
            debug!(count = catches.len(), "catch clauses are not lowered");
        }

        if let Some(finally) = finally {
            self.generate_block(finally);
        }

        self.reduce("TryStatement");
    }

    /// Evaluates a branch condition and returns the place to test, or
    /// `None` when no branch can be emitted for it.
    pub(super) fn generate_condition(&mut self, cond: &Spanned<Expr>) -> Option<Place> {
        let value = self.generate_expr(cond);

        self.condition_place(value, cond.span)
    }

    pub(super) fn condition_place(&mut self, value: Value, span: Span) -> Option<Place> {
        match value.ty() {
            _ if value.is_poisoned() => None,
            None => {
                debug!(condition = %value.describe(), "condition is not lowered");
                None
            }
            Some(ty) if ty.is_truth_value() => Some(self.resolve(&value)),
            Some(_) => {
                self.error(SemanticError::InvalidCondition(value.describe()), span);
                None
            }
        }
    }

    /// Resolves an operand that must be a lowered scalar, reporting `err`
    /// for values of any other kind.
    fn usable_operand(
        &mut self,
        value: Value,
        span: Span,
        err: fn(String) -> SemanticError,
    ) -> Option<Place> {
        match value {
            Value::TypeError | Value::Opaque { .. } => None,
            Value::Array { .. } => {
                self.error(err(value.describe()), span);
                None
            }
            _ => Some(self.resolve(&value)),
        }
    }

    pub(super) fn emit_branch_unless(&mut self, cond: Option<Place>, label: &Label) {
        if let Some(place) = cond {
            self.emit(Tac::IfGoto {
                lhs: place,
                cmp: Comparison::Eq,
                rhs: "0".to_string(),
                label: label.clone(),
            });
        }
    }

    /// Turns an addressable or pending value into a plain operand.
    pub(super) fn resolve(&mut self, value: &Value) -> Place {
        match value {
            Value::Scalar { place, .. } => place.clone(),
            Value::ArrayAccess { .. } => {
                let temp = self.new_temp();

                self.emit(Tac::Assign {
                    dest: temp.clone(),
                    src: value.describe(),
                });

                temp
            }
            Value::Input => {
                let temp = self.new_temp();

                self.emit(Tac::Input { dest: temp.clone() });

                temp
            }
            other => other.describe(),
        }
    }

    pub(super) fn reduce(&mut self, production: &'static str) {
        self.trace.push(production);
    }

    pub(super) fn error(&mut self, err: SemanticError, span: Span) {
        self.emitter.error(err, span);
    }

    pub(super) fn emit(&mut self, instr: Tac) {
        self.emitter.emit(instr);
    }

    pub(super) fn emit_label(&mut self, label: Label) {
        self.emit(Tac::Label { label })
    }

    pub(super) fn emit_jump(&mut self, label: Label) {
        self.emit(Tac::Goto { label })
    }

    pub(super) fn new_temp(&mut self) -> Place {
        self.symbols.temp()
    }

    pub(super) fn new_label(&mut self) -> Label {
        self.emitter.new_label()
    }
}
