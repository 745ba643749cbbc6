//! String Table
//!
//! Commit-scoped interning of display names, element keys and wrapper
//! names. References are 1-based; 0 is reserved for "no string", so an
//! absent key costs a single zero in the operation stream. Iteration order
//! is insertion order, which the transport frame relies on.

use indexmap::IndexSet;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct StringTable {
    entries: IndexSet<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            entries: IndexSet::new(),
        }
    }

    /// Intern `value`, returning its 1-based reference. Repeated values
    /// within one commit share a reference.
    pub fn intern(&mut self, value: &str) -> i32 {
        if let Some(index) = self.entries.get_index_of(value) {
            return (index + 1) as i32;
        }
        let (index, _) = self.entries.insert_full(value.to_string());
        (index + 1) as i32
    }

    /// Reference for an optional value; `None` encodes as 0.
    pub fn intern_opt(&mut self, value: Option<&str>) -> i32 {
        match value {
            Some(value) => self.intern(value),
            None => 0,
        }
    }

    /// Value behind a reference; 0 and out-of-range references yield `None`.
    pub fn get(&self, reference: i32) -> Option<&str> {
        if reference < 1 {
            return None;
        }
        self.entries
            .get_index(reference as usize - 1)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interned values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
