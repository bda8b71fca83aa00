//! Form state: one value per field that has been written.

use crate::field::FieldValue;
use std::collections::HashMap;

/// Values of the fields the caller has set during one form fill.
///
/// A field with no entry has never been set and validates as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
}

impl FormState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Replace a field's value, returning the previous one.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.to_string(), value)
    }

    /// Forget a field's value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Check if a field has been set.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field has been set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
