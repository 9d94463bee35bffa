mod control_flow;
mod emitter;
mod error;
mod evaluator;
mod expr;
mod printer;
mod symbol_table;
mod tac;
mod value;

#[cfg(test)]
mod tests;

pub use control_flow::ControlFlow;
pub use emitter::Emitter;
pub use error::{Diagnostic, SemanticError};
pub use evaluator::{Evaluator, LoweredProgram};
pub use printer::{diagnostics_to_string, program_to_string};
pub use symbol_table::SymbolTable;
pub use tac::{Label, Tac};
pub use value::{Place, Type, Value};

use crate::parser::CompilationUnit;

/// Type checks `unit` and lowers it to a flat instruction log.
pub fn lower_program(unit: &CompilationUnit) -> LoweredProgram {
    let mut evaluator = Evaluator::new();

    evaluator.generate_unit(unit);

    evaluator.finish()
}
