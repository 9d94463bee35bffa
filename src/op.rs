#[derive(Copy, Clone, PartialEq, Debug)]
pub enum UnaryOp {
    Plus,
    Negate,
    BitNot,
    Not,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum BinaryOp {
    Multiply,
    Divide,
    Modulo,
    Plus,
    Minus,
    ShiftLeft,
    ShiftRight,
    Lt,
    Gt,
    Lte,
    Gte,
    Equal,
    NotEqual,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

/// Comparison carried by a conditional branch. `!=` has no comparison of
/// its own, it is lowered as `eq` with the outcomes swapped.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Comparison {
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
}

impl Comparison {
    pub fn lexeme(&self) -> &'static str {
        match self {
            Comparison::Lt => "l",
            Comparison::Gt => "g",
            Comparison::Lte => "le",
            Comparison::Gte => "ge",
            Comparison::Eq => "eq",
        }
    }

    pub fn holds(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Lte => lhs <= rhs,
            Comparison::Gte => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
        }
    }
}

impl BinaryOp {
    /// Returns the comparison to branch on and whether the 0/1 outcomes
    /// are swapped, or `None` for operators that lower to a single binop.
    pub fn comparison(&self) -> Option<(Comparison, bool)> {
        match self {
            BinaryOp::Lt => Some((Comparison::Lt, false)),
            BinaryOp::Gt => Some((Comparison::Gt, false)),
            BinaryOp::Lte => Some((Comparison::Lte, false)),
            BinaryOp::Gte => Some((Comparison::Gte, false)),
            BinaryOp::Equal => Some((Comparison::Eq, false)),
            BinaryOp::NotEqual => Some((Comparison::Eq, true)),
            _ => None,
        }
    }

    /// Operator text carried by the emitted binop instruction.
    pub fn lexeme(&self) -> &'static str {
        match self {
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::BitAnd | BinaryOp::And => "and",
            BinaryOp::BitXor => "xor",
            BinaryOp::BitOr | BinaryOp::Or => "or",
        }
    }

    /// Name of the production that reduces this operator.
    pub fn production(&self) -> &'static str {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => "MultiplicativeExpression",
            BinaryOp::Plus | BinaryOp::Minus => "AdditiveExpression",
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => "ShiftExpression",
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => "RelationalExpression",
            BinaryOp::Equal | BinaryOp::NotEqual => "EqualityExpression",
            BinaryOp::BitAnd => "AndExpression",
            BinaryOp::BitXor => "ExclusiveOrExpression",
            BinaryOp::BitOr => "InclusiveOrExpression",
            BinaryOp::And => "ConditionalAndExpression",
            BinaryOp::Or => "ConditionalOrExpression",
        }
    }
}

impl IncDecOp {
    pub fn binop(&self) -> BinaryOp {
        match self {
            IncDecOp::Increment => BinaryOp::Plus,
            IncDecOp::Decrement => BinaryOp::Minus,
        }
    }
}
