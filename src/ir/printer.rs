use super::error::Diagnostic;
use super::tac::Tac;
use std::fmt;

impl fmt::Display for Tac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tac::Assign { dest, src } => write!(f, "{} = {}", dest, src),
            Tac::Binop { dest, lhs, op, rhs } => write!(f, "{} = {} {} {}", dest, lhs, op, rhs),
            Tac::Declare { dest, size, elem } => write!(f, "declare {}, {}, {}", dest, size, elem),
            Tac::Input { dest } => write!(f, "input {}", dest),
            Tac::Label { label } => write!(f, "{}:", label),
            Tac::Goto { label } => write!(f, "goto {}", label),
            Tac::IfGoto { lhs, cmp, rhs, label } => {
                write!(f, "if {} {} {} goto {}", lhs, cmp.lexeme(), rhs, label)
            }
            Tac::Func { name } => write!(f, "func {}", name),
            Tac::CallLabel { name } => write!(f, "{}:", name),
            Tac::Ret => write!(f, "ret"),
        }
    }
}

/// One instruction per line.
pub fn program_to_string(instrs: &[Tac]) -> String {
    let mut output = String::new();

    for instr in instrs.iter() {
        output.push_str(&instr.to_string());
        output.push('\n');
    }

    output
}

pub fn diagnostics_to_string(diagnostics: &[Diagnostic], source: &str) -> String {
    let mut output = String::new();

    for diagnostic in diagnostics.iter() {
        output.push_str(&diagnostic.render(source));
        output.push('\n');
    }

    output
}
