use super::error::SemanticError;
use super::evaluator::Evaluator;
use super::tac::Tac;
use super::value::{Place, Type, Value};
use crate::op::{AssignOp, BinaryOp, Comparison, IncDecOp, UnaryOp};
use crate::parser::{Expr, Literal, Name, Span, Spanned, TypeName};
use tracing::debug;

impl Evaluator {
    pub fn generate_expr(&mut self, spanned_expr: &Spanned<Expr>) -> Value {
        let span = spanned_expr.get_span();

        match &spanned_expr.item {
            Expr::Literal(literal) => {
                self.reduce("Literal");
                generate_literal(literal)
            }
            Expr::Name(name) => self.generate_name(name, span),
            Expr::This => {
                self.reduce("PrimaryNoNewArray");
                Value::opaque("this")
            }
            Expr::Super => {
                self.reduce("PrimaryNoNewArray");
                Value::opaque("super")
            }
            Expr::ArrayAccess { array, index } => {
                let array = self.generate_expr(array);
                let index_span = index.span;
                let index = self.generate_expr(index);

                self.reduce("ArrayAccess");
                self.generate_array_access(array, index, span, index_span)
            }
            Expr::FieldAccess { target, field } => {
                self.generate_expr(target);
                self.reduce("FieldAccess");
                Value::opaque(format!("field access .{}", field))
            }
            Expr::Call { target, method, args } => {
                if let Some(target) = target {
                    // qualified names like `System.out` are never bound
                    if !matches!(target.item, Expr::Name(_)) {
                        self.generate_expr(target);
                    }
                }

                for arg in args.iter() {
                    self.generate_expr(arg);
                }

                self.reduce("MethodInvocation");

                if target.is_some() && method == "nextInt" {
                    Value::Input
                } else {
                    Value::opaque(format!("call to {}", method))
                }
            }
            Expr::New { class, args } => {
                for arg in args.iter() {
                    self.generate_expr(arg);
                }

                self.reduce("ClassInstanceCreationExpression");
                Value::opaque(format!("new {}", class))
            }
            Expr::NewArray { elem, dims, extra_dims } => {
                self.generate_new_array(elem, dims, *extra_dims)
            }
            Expr::ArrayInit(items) => {
                for item in items.iter() {
                    self.generate_expr(item);
                }

                self.reduce("ArrayInitializer");
                Value::opaque("array initializer")
            }
            Expr::Unary { op, expr } => {
                let value = self.generate_expr(expr);

                self.reduce("UnaryExpression");
                self.generate_unary(*op, value, span)
            }
            Expr::IncDec { op, prefix, expr } => self.generate_inc_dec(*op, *prefix, expr),
            Expr::Cast { ty, expr } => {
                let value = self.generate_expr(expr);

                self.reduce("CastExpression");
                generate_cast(ty, value)
            }
            Expr::Binop { lhs, op, rhs } => {
                let lhs = self.generate_expr(lhs);
                let rhs = self.generate_expr(rhs);

                self.reduce(op.production());

                match op.comparison() {
                    Some((cmp, swapped)) => {
                        self.generate_relational(lhs, *op, cmp, swapped, rhs, span)
                    }
                    None => self.generate_binop(lhs, *op, rhs, span),
                }
            }
            Expr::InstanceOf { expr, ty } => {
                self.generate_expr(expr);
                self.reduce("RelationalExpression");
                Value::opaque(format!("instanceof {}", ty))
            }
            Expr::Conditional { cond, then, otherwise } => {
                self.generate_conditional(cond, then, otherwise, span)
            }
            Expr::Assign { dest, op, src } => self.generate_assign(dest, *op, src, span),
        }
    }

    fn generate_name(&mut self, name: &Name, span: Span) -> Value {
        self.reduce("Name");

        if !name.is_simple() {
            return Value::opaque(name.to_string());
        }

        let ident = name.last();

        match self.symbols.lookup(ident) {
            Ok(ty) => Value::scalar(ident, ty.clone()),
            Err(err) => {
                self.error(err, span);
                Value::TypeError
            }
        }
    }

    fn generate_array_access(
        &mut self,
        array: Value,
        index: Value,
        span: Span,
        index_span: Span,
    ) -> Value {
        if array.is_poisoned() || index.is_poisoned() {
            return Value::TypeError;
        }

        if array.is_opaque() || index.is_opaque() {
            return Value::opaque(format!("{}[{}]", array.describe(), index.describe()));
        }

        let elem = match array.ty().as_ref().and_then(Type::elem) {
            Some(elem) => elem.clone(),
            None => {
                self.error(SemanticError::NotAnArray(array.describe()), span);
                return Value::TypeError;
            }
        };

        if !index.ty().is_some_and(|ty| ty.is_int()) {
            self.error(SemanticError::ArrayIndexNotInteger(index.describe()), index_span);
            return Value::TypeError;
        }

        let base = self.resolve(&array);
        let index = self.resolve(&index);

        Value::ArrayAccess { base, index, ty: elem }
    }

    fn generate_new_array(
        &mut self,
        elem: &TypeName,
        dims: &[Spanned<Expr>],
        extra_dims: usize,
    ) -> Value {
        let sizes: Vec<(Value, Span)> = dims
            .iter()
            .map(|dim| (self.generate_expr(dim), dim.span))
            .collect();

        self.reduce("ArrayCreationExpression");

        let (size, span) = match sizes.as_slice() {
            [single] if extra_dims == 0 => single.clone(),
            _ => {
                let brackets = "[]".repeat(dims.len() + extra_dims);

                return Value::opaque(format!("new {}{}", elem, brackets));
            }
        };

        if size.is_poisoned() {
            return Value::TypeError;
        }

        if !size.ty().is_some_and(|ty| ty.is_int()) {
            self.error(SemanticError::ArraySizeNotInteger(size.describe()), span);
            return Value::TypeError;
        }

        Value::Array {
            size: self.resolve(&size),
            elem: Type::from_type_name(elem),
        }
    }

    fn generate_unary(&mut self, op: UnaryOp, value: Value, span: Span) -> Value {
        if value.is_poisoned() {
            return Value::TypeError;
        }

        if value.is_opaque() {
            return value;
        }

        let ty = value.ty();
        let accepted = match op {
            UnaryOp::Not => ty.is_some_and(|ty| ty.is_truth_value()),
            _ => ty.is_some_and(|ty| ty.is_int()),
        };

        if !accepted {
            self.error(SemanticError::InvalidOperand(value.describe()), span);
            return Value::TypeError;
        }

        match op {
            UnaryOp::Plus => value,
            UnaryOp::Negate => {
                let src = self.resolve(&value);

                self.emit_binop("0".to_string(), BinaryOp::Minus, src)
            }
            UnaryOp::BitNot => {
                let src = self.resolve(&value);

                self.emit_binop(src, BinaryOp::BitXor, "-1".to_string())
            }
            UnaryOp::Not => {
                let src = self.resolve(&value);

                self.emit_comparison(src, Comparison::Eq, "0".to_string(), false)
            }
        }
    }

    fn generate_inc_dec(&mut self, op: IncDecOp, prefix: bool, expr: &Spanned<Expr>) -> Value {
        let value = self.generate_expr(expr);

        self.reduce(match (op, prefix) {
            (IncDecOp::Increment, true) => "PreIncrementExpression",
            (IncDecOp::Increment, false) => "PostIncrementExpression",
            (IncDecOp::Decrement, true) => "PreDecrementExpression",
            (IncDecOp::Decrement, false) => "PostDecrementExpression",
        });

        if value.is_poisoned() {
            return Value::TypeError;
        }

        if value.is_opaque() {
            return value;
        }

        if !expr.item.is_assignable() {
            self.error(SemanticError::InvalidOperand(value.describe()), expr.span);
            return Value::TypeError;
        }

        if !value.ty().is_some_and(|ty| ty.is_int()) {
            self.error(SemanticError::InvalidIncrementOperand(value.describe()), expr.span);
            return Value::TypeError;
        }

        let op = op.binop().lexeme();

        // both forms yield the updated place
        match &value {
            Value::ArrayAccess { .. } => {
                let temp = self.resolve(&value);

                self.emit(Tac::Binop {
                    dest: temp.clone(),
                    lhs: temp.clone(),
                    op,
                    rhs: "1".to_string(),
                });
                self.emit(Tac::Assign {
                    dest: value.describe(),
                    src: temp.clone(),
                });

                Value::scalar(temp, Type::Int)
            }
            _ => {
                let place = self.resolve(&value);

                self.emit(Tac::Binop {
                    dest: place.clone(),
                    lhs: place.clone(),
                    op,
                    rhs: "1".to_string(),
                });

                Value::scalar(place, Type::Int)
            }
        }
    }

    fn generate_binop(&mut self, lhs: Value, op: BinaryOp, rhs: Value, span: Span) -> Value {
        if lhs.is_poisoned() || rhs.is_poisoned() {
            return Value::TypeError;
        }

        if lhs.is_opaque() || rhs.is_opaque() {
            debug!(lhs = %lhs.describe(), rhs = %rhs.describe(), "operation on an unlowered value");
            return Value::opaque(format!("{} {} {}", lhs.describe(), op.lexeme(), rhs.describe()));
        }

        if !operands_fit(op, &lhs, &rhs) {
            self.error(
                SemanticError::TypeMismatch {
                    lhs: lhs.describe(),
                    rhs: rhs.describe(),
                },
                span,
            );
            return Value::TypeError;
        }

        let l = self.resolve(&lhs);
        let r = self.resolve(&rhs);

        self.emit_binop(l, op, r)
    }

    fn generate_relational(
        &mut self,
        lhs: Value,
        op: BinaryOp,
        cmp: Comparison,
        swapped: bool,
        rhs: Value,
        span: Span,
    ) -> Value {
        if lhs.is_poisoned() || rhs.is_poisoned() {
            return Value::TypeError;
        }

        if lhs.is_opaque() || rhs.is_opaque() {
            debug!(
                lhs = %lhs.describe(),
                rhs = %rhs.describe(),
                "comparison with an unlowered value"
            );
            return Value::opaque(format!("{} {} {}", lhs.describe(), op.lexeme(), rhs.describe()));
        }

        if !operands_fit(op, &lhs, &rhs) {
            self.error(
                SemanticError::TypeMismatch {
                    lhs: lhs.describe(),
                    rhs: rhs.describe(),
                },
                span,
            );
            return Value::TypeError;
        }

        let l = self.resolve(&lhs);
        let r = self.resolve(&rhs);

        self.emit_comparison(l, cmp, r, swapped)
    }

    fn generate_conditional(
        &mut self,
        cond: &Spanned<Expr>,
        then: &Spanned<Expr>,
        otherwise: &Spanned<Expr>,
        span: Span,
    ) -> Value {
        let mark = self.emitter.mark();
        let cond_value = self.generate_expr(cond);

        let test = match cond_value {
            Value::TypeError => Err(Value::TypeError),
            Value::Opaque { .. } => {
                debug!(condition = %cond_value.describe(), "conditional on an unlowered value");
                Err(Value::opaque("conditional expression"))
            }
            _ => self.condition_place(cond_value, cond.span).ok_or(Value::TypeError),
        };

        let place = match test {
            Ok(place) => place,
            Err(result) => {
                // arms are still checked for their own errors
                self.generate_expr(then);
                self.generate_expr(otherwise);
                self.emitter.rollback(mark);
                self.reduce("ConditionalExpression");
                return result;
            }
        };

        let else_start = self.new_label();
        let end = self.new_label();
        let temp = self.new_temp();
        let mut arms = vec![];

        self.emit_branch_unless(Some(place), &else_start);

        let value = self.generate_expr(then);
        arms.push(self.assign_arm(&temp, value));

        self.emit_jump(end.clone());
        self.emit_label(else_start);

        let value = self.generate_expr(otherwise);
        arms.push(self.assign_arm(&temp, value));

        self.emit_label(end);
        self.reduce("ConditionalExpression");

        let rejected: Vec<Value> = arms.into_iter().filter_map(Result::err).collect();

        if rejected.is_empty() {
            return Value::scalar(temp, Type::Int);
        }

        self.emitter.rollback(mark);

        if rejected.iter().any(Value::is_poisoned) {
            return Value::TypeError;
        }

        if let Some(arm) = rejected.iter().find(|arm| !arm.is_opaque()) {
            self.error(
                SemanticError::TypeMismatch {
                    lhs: temp,
                    rhs: arm.describe(),
                },
                span,
            );
            return Value::TypeError;
        }

        Value::opaque("conditional expression")
    }

    /// Copies an integer arm of a conditional into `temp`, or hands the
    /// value back when it cannot be copied.
    fn assign_arm(&mut self, temp: &Place, value: Value) -> Result<(), Value> {
        if !value.ty().is_some_and(|ty| ty.is_int()) {
            return Err(value);
        }

        let src = self.resolve(&value);

        self.emit(Tac::Assign {
            dest: temp.clone(),
            src,
        });

        Ok(())
    }

    fn generate_assign(
        &mut self,
        dest: &Spanned<Expr>,
        op: AssignOp,
        src: &Spanned<Expr>,
        span: Span,
    ) -> Value {
        let dest_value = self.generate_expr(dest);
        let src_value = self.generate_expr(src);

        self.reduce("Assignment");

        if !dest.item.is_assignable() {
            if !dest_value.is_poisoned() {
                self.error(SemanticError::InvalidOperand(dest_value.describe()), dest.span);
            }
            return Value::TypeError;
        }

        match op {
            AssignOp::Assign => self.generate_simple_assign(dest_value, src_value, span),
            AssignOp::Compound(op) => {
                self.generate_compound_assign(dest_value, op, src_value, span)
            }
        }
    }

    /// `dest = value`, shared by assignments and initialized declarators.
    pub(super) fn generate_simple_assign(
        &mut self,
        dest: Value,
        value: Value,
        span: Span,
    ) -> Value {
        if dest.is_poisoned() || value.is_poisoned() {
            return Value::TypeError;
        }

        if dest.is_opaque() || value.is_opaque() {
            debug!(dest = %dest.describe(), src = %value.describe(), "assignment is not lowered");
            return dest;
        }

        let dest_ty = dest.ty().unwrap_or(Type::Null);
        let src_ty = value.ty().unwrap_or(Type::Null);

        if !dest_ty.accepts(&src_ty) {
            self.error(
                SemanticError::TypeMismatch {
                    lhs: dest.describe(),
                    rhs: value.describe(),
                },
                span,
            );
            return Value::TypeError;
        }

        match value {
            Value::Array { size, elem } => self.emit(Tac::Declare {
                dest: dest.describe(),
                size,
                elem,
            }),
            Value::Input => self.emit(Tac::Input { dest: dest.describe() }),
            value => {
                let src = self.resolve(&value);

                self.emit(Tac::Assign {
                    dest: dest.describe(),
                    src,
                });
            }
        }

        dest
    }

    fn generate_compound_assign(
        &mut self,
        dest: Value,
        op: BinaryOp,
        value: Value,
        span: Span,
    ) -> Value {
        if dest.is_poisoned() || value.is_poisoned() {
            return Value::TypeError;
        }

        if dest.is_opaque() || value.is_opaque() {
            debug!(
                dest = %dest.describe(),
                src = %value.describe(),
                "compound assignment is not lowered"
            );

            let what = format!("{} {}= {}", dest.describe(), op.lexeme(), value.describe());

            return Value::opaque(what);
        }

        let is_int = |value: &Value| value.ty().is_some_and(|ty| ty.is_int());
        let both_int = is_int(&dest) && is_int(&value);

        if !both_int {
            self.error(
                SemanticError::TypeMismatch {
                    lhs: dest.describe(),
                    rhs: value.describe(),
                },
                span,
            );
            return Value::TypeError;
        }

        let src = self.resolve(&value);
        let current = self.resolve(&dest);
        let result = self.emit_binop(current, op, src);

        if let Value::Scalar { place, .. } = &result {
            self.emit(Tac::Assign {
                dest: dest.describe(),
                src: place.clone(),
            });
        }

        result
    }

    fn emit_binop(&mut self, lhs: Place, op: BinaryOp, rhs: Place) -> Value {
        let dest = self.new_temp();

        self.emit(Tac::Binop {
            dest: dest.clone(),
            lhs,
            op: op.lexeme(),
            rhs,
        });

        Value::scalar(dest, Type::Int)
    }

    /// Materializes `lhs cmp rhs` as 0 or 1 through a branch.
    fn emit_comparison(&mut self, lhs: Place, cmp: Comparison, rhs: Place, swapped: bool) -> Value {
        let if_false = self.new_label();
        let if_true = self.new_label();
        let end = self.new_label();
        let dest = self.new_temp();
        let (on_false, on_true) = if swapped { ("1", "0") } else { ("0", "1") };

        self.emit(Tac::IfGoto {
            lhs,
            cmp,
            rhs,
            label: if_true.clone(),
        });
        self.emit_jump(if_false.clone());
        self.emit_label(if_false);
        self.emit(Tac::Assign {
            dest: dest.clone(),
            src: on_false.to_string(),
        });
        self.emit_jump(end.clone());
        self.emit_label(if_true);
        self.emit(Tac::Assign {
            dest: dest.clone(),
            src: on_true.to_string(),
        });
        self.emit_label(end);

        Value::scalar(dest, Type::Int)
    }
}

/// Arithmetic and ordering need two integers. Logical operators and
/// equality also take booleans, which are materialized as 0 and 1.
fn operands_fit(op: BinaryOp, lhs: &Value, rhs: &Value) -> bool {
    let test: fn(&Type) -> bool = match op {
        BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Equal
        | BinaryOp::NotEqual => Type::is_truth_value,
        _ => Type::is_int,
    };

    lhs.ty().is_some_and(|ty| test(&ty)) && rhs.ty().is_some_and(|ty| test(&ty))
}

fn generate_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Int(lexeme) => Value::scalar(lexeme.clone(), Type::Int),
        Literal::Float(lexeme) if lexeme.ends_with(['f', 'F']) => {
            Value::scalar(lexeme.clone(), Type::Float)
        }
        Literal::Float(lexeme) => Value::scalar(lexeme.clone(), Type::Double),
        Literal::Char(c) => Value::scalar(format!("'{}'", c), Type::Char),
        Literal::Str(s) => Value::scalar(format!("\"{}\"", s), Type::Str),
        Literal::Bool(true) => Value::scalar("1", Type::Boolean),
        Literal::Bool(false) => Value::scalar("0", Type::Boolean),
        Literal::Null => Value::scalar("null", Type::Null),
    }
}

fn generate_cast(ty: &TypeName, value: Value) -> Value {
    if value.is_poisoned() {
        return Value::TypeError;
    }

    let target = match ty {
        TypeName::Primitive(_) => Type::from_type_name(ty),
        _ => return Value::opaque(format!("cast to {}", ty)),
    };

    match value {
        Value::Scalar { place, .. } => Value::Scalar { place, ty: target },
        Value::ArrayAccess { base, index, .. } => Value::ArrayAccess { base, index, ty: target },
        other => other,
    }
}
