use super::value::{Place, Type};
use crate::op::Comparison;

pub type Label = String;

#[derive(Clone, Debug, PartialEq)]
pub enum Tac {
    Assign {
        dest: Place,
        src: Place,
    },
    Binop {
        dest: Place,
        lhs: Place,
        op: &'static str,
        rhs: Place,
    },
    Declare {
        dest: Place,
        size: Place,
        elem: Type,
    },
    Input {
        dest: Place,
    },
    Label {
        label: Label,
    },
    Goto {
        label: Label,
    },
    IfGoto {
        lhs: Place,
        cmp: Comparison,
        rhs: Place,
        label: Label,
    },
    Func {
        name: String,
    },
    CallLabel {
        name: String,
    },
    Ret,
}

impl Tac {
    /// The instruction as `(op, operand1, operand2, result)`. Unused
    /// slots are empty strings.
    pub fn quad(&self) -> (&'static str, String, String, String) {
        let none = String::new;

        match self {
            Tac::Assign { dest, src } => ("=", src.clone(), none(), dest.clone()),
            Tac::Binop { dest, lhs, op, rhs } => (*op, lhs.clone(), rhs.clone(), dest.clone()),
            Tac::Declare { dest, size, elem } => {
                ("declare", size.clone(), elem.to_string(), dest.clone())
            }
            Tac::Input { dest } => ("input", none(), none(), dest.clone()),
            Tac::Label { label } => ("label", none(), none(), label.clone()),
            Tac::Goto { label } => ("goto", none(), none(), label.clone()),
            Tac::IfGoto { lhs, cmp, rhs, label } => (
                "ifgoto",
                lhs.clone(),
                format!("{} {}", cmp.lexeme(), rhs),
                label.clone(),
            ),
            Tac::Func { name } => ("func", none(), none(), name.clone()),
            Tac::CallLabel { name } => ("label", none(), none(), name.clone()),
            Tac::Ret => ("ret", none(), none(), none()),
        }
    }

    pub fn dest(&self) -> Option<&Place> {
        match self {
            Tac::Assign { dest, .. }
            | Tac::Binop { dest, .. }
            | Tac::Declare { dest, .. }
            | Tac::Input { dest } => Some(dest),
            _ => None,
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, Tac::Goto { .. } | Tac::IfGoto { .. })
    }
}
