use super::error::{Diagnostic, SemanticError};
use super::tac::{Label, Tac};
use crate::parser::Span;
use tracing::{debug, trace};

/// The ordered instruction log plus the diagnostics raised while filling it.
#[derive(Debug, Default)]
pub struct Emitter {
    instrs: Vec<Tac>,
    diagnostics: Vec<Diagnostic>,
    label_counter: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, instr: Tac) {
        trace!(?instr, "emit");
        self.instrs.push(instr);
    }

    /// Position in the log that `rollback` can return to.
    pub fn mark(&self) -> usize {
        self.instrs.len()
    }

    /// Drops every instruction emitted since `mark`. Diagnostics are kept.
    pub fn rollback(&mut self, mark: usize) {
        trace!(dropped = self.instrs.len().saturating_sub(mark), "rollback");
        self.instrs.truncate(mark);
    }

    pub fn new_label(&mut self) -> Label {
        self.label_counter += 1;

        format!("L{}", self.label_counter)
    }

    pub fn error(&mut self, error: SemanticError, span: Span) {
        debug!(%error, ?span, "semantic error");
        self.diagnostics.push(Diagnostic::new(error, span));
    }

    pub fn instrs(&self) -> &[Tac] {
        &self.instrs
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Vec<Tac>, Vec<Diagnostic>) {
        (self.instrs, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_are_fresh_and_errors_do_not_stop_emission() {
        let mut emitter = Emitter::new();
        let first = emitter.new_label();
        let second = emitter.new_label();

        emitter.error(SemanticError::BreakOutsideLoop, Span::new(0, 5));
        emitter.emit(Tac::Goto { label: second.clone() });

        assert_eq!((first.as_str(), second.as_str()), ("L1", "L2"));
        assert_eq!(emitter.instrs().len(), 1);
        assert_eq!(emitter.diagnostics().len(), 1);

        let (instrs, diagnostics) = emitter.into_parts();

        assert_eq!(instrs, vec![Tac::Goto { label: "L2".to_string() }]);
        assert_eq!(diagnostics[0].error, SemanticError::BreakOutsideLoop);
    }

    #[test]
    fn rollback_keeps_diagnostics() {
        let mut emitter = Emitter::new();

        emitter.emit(Tac::Ret);
        let mark = emitter.mark();
        emitter.emit(Tac::Goto { label: "L1".to_string() });
        emitter.error(SemanticError::BreakOutsideLoop, Span::new(0, 5));
        emitter.rollback(mark);

        assert_eq!(emitter.instrs(), &[Tac::Ret]);
        assert_eq!(emitter.diagnostics().len(), 1);
    }
}
