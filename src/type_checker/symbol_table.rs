use std::collections::HashMap;

use log::trace;

use crate::{
    ast::{ast::NameDefId, types::Type},
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// One live binding of a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub scope_serial: u32,
    pub name_def: NameDefId,
    pub ty: Type,
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    serial: u32,
    /// Index of the first symbol owned by this scope
    start: usize,
}

/// Scoped symbol table.
///
/// Symbols live in one flat arena in insertion order. Each open scope owns
/// the tail of the arena from its start index, so leaving a scope is a
/// truncation. `name_lookup` keeps, per name, the arena indices of its live
/// bindings in increasing order; the last one is the innermost.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    name_lookup: HashMap<String, Vec<usize>>,
    next_serial: u32,
}

impl SymbolTable {
    /// Creates a table with the global scope (serial 0) already open.
    pub fn new() -> Self {
        SymbolTable {
            symbols: Vec::new(),
            scopes: vec![Scope { serial: 0, start: 0 }],
            name_lookup: HashMap::new(),
            next_serial: 1,
        }
    }

    /// Opens a nested scope and returns its serial.
    pub fn enter_scope(&mut self) -> u32 {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.scopes.push(Scope { serial, start: self.symbols.len() });

        trace!("enter scope {}", serial);
        serial
    }

    /// Closes the innermost scope, dropping every binding it owns.
    ///
    /// # Panics
    ///
    /// Panics when only the global scope is open.
    pub fn leave_scope(&mut self) {
        let scope = match self.scopes.pop() {
            Some(scope) if !self.scopes.is_empty() => scope,
            _ => panic!("attempted to leave the global scope"),
        };

        for symbol in self.symbols.drain(scope.start..).rev() {
            if let Some(indices) = self.name_lookup.get_mut(&symbol.name) {
                indices.pop();
                if indices.is_empty() {
                    self.name_lookup.remove(&symbol.name);
                }
            }
        }

        trace!("leave scope {}", scope.serial);
    }

    /// Binds `name` to `name_def` in the innermost scope.
    ///
    /// Binding the same definition twice is a no-op. Binding a different
    /// definition to a name the innermost scope already holds fails.
    pub fn insert(&mut self, name: &str, name_def: NameDefId, ty: Type, position: Position) -> Result<(), Error> {
        if let Some(existing) = self.lookup_current_scope(name) {
            if existing.name_def == name_def {
                return Ok(());
            }

            return Err(Error::new(ErrorImpl::VariableAlreadyDeclared { variable: name.to_string() }, position));
        }

        let scope_serial = self.current_serial();
        trace!("insert {} : {} ({:?}) in scope {}", name, ty, name_def, scope_serial);

        self.name_lookup.entry(name.to_string()).or_default().push(self.symbols.len());
        self.symbols.push(Symbol { name: name.to_string(), scope_serial, name_def, ty });

        Ok(())
    }

    /// Innermost live binding of `name` across every open scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.name_lookup
            .get(name)
            .and_then(|indices| indices.last())
            .map(|&index| &self.symbols[index])
    }

    /// Binding of `name` in the innermost scope only.
    pub fn lookup_current_scope(&self, name: &str) -> Option<&Symbol> {
        let start = self.current_scope().start;

        self.name_lookup
            .get(name)
            .and_then(|indices| indices.last())
            .filter(|&&index| index >= start)
            .map(|&index| &self.symbols[index])
    }

    pub fn current_serial(&self) -> u32 {
        self.current_scope().serial
    }

    /// Number of open scopes, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn current_scope(&self) -> Scope {
        // The global scope is never popped
        self.scopes[self.scopes.len() - 1]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
