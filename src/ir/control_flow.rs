use super::tac::Label;

/// Jump targets of the enclosing loops, switches and method bodies.
///
/// The two stacks always have the same depth. A switch has no continue
/// target of its own, so it repeats the one around it, which may be `None`.
#[derive(Debug, Default)]
pub struct ControlFlow {
    loop_begin_labels: Vec<Option<Label>>,
    loop_end_labels: Vec<Label>,
}

impl ControlFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, begin: Option<Label>, end: Label) {
        self.loop_begin_labels.push(begin);
        self.loop_end_labels.push(end);
    }

    pub fn pop(&mut self) {
        self.loop_begin_labels.pop();
        self.loop_end_labels.pop();
    }

    pub fn break_target(&self) -> Option<&Label> {
        self.loop_end_labels.last()
    }

    pub fn continue_target(&self) -> Option<&Label> {
        self.loop_begin_labels.last().and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn switch_inherits_the_enclosing_continue_target() {
        let mut flow = ControlFlow::new();

        assert_eq!(flow.break_target(), None);

        flow.push(Some("L1".to_string()), "L2".to_string());
        let outer = flow.continue_target().cloned();
        flow.push(outer, "L3".to_string());

        assert_eq!(flow.break_target().map(String::as_str), Some("L3"));
        assert_eq!(flow.continue_target().map(String::as_str), Some("L1"));

        flow.pop();
        flow.pop();

        assert_eq!(flow.break_target(), None);
        assert_eq!(flow.continue_target(), None);
    }
}
