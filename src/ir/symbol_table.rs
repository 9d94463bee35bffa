use super::error::SemanticError;
use super::value::{Place, Type};
use std::collections::{HashMap, HashSet};

/// Declared names and their types. There is one flat scope for the whole
/// compilation unit; entries are never removed.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, Type>,
    params: HashSet<String>,
    temp_counter: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), SemanticError> {
        if self.entries.contains_key(name) {
            return Err(SemanticError::DuplicateDeclaration(name.to_string()));
        }

        self.entries.insert(name.to_string(), ty);

        Ok(())
    }

    /// Like `declare`, but a parameter may repeat an earlier parameter of
    /// the same type, as in two methods that both take `int n`.
    pub fn declare_param(&mut self, name: &str, ty: Type) -> Result<(), SemanticError> {
        if self.params.contains(name) && self.entries.get(name) == Some(&ty) {
            return Ok(());
        }

        self.declare(name, ty)?;
        self.params.insert(name.to_string());

        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Type, SemanticError> {
        self.entries
            .get(name)
            .ok_or_else(|| SemanticError::UndeclaredIdentifier(name.to_string()))
    }

    pub fn temp(&mut self) -> Place {
        self.temp_counter += 1;

        format!("t{}", self.temp_counter)
    }
}
