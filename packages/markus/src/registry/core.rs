//! Operation registry mapping operation names to descriptors.

use std::collections::HashMap;
use std::str::FromStr;

use super::types::{Operation, OperationDescriptor};
use crate::error::{MarkusError, Result};

/// Registry of operation descriptors.
///
/// Built once and read-only afterwards, so it can be shared between
/// threads without locking.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    descriptors: HashMap<Operation, OperationDescriptor>,
}

impl OperationRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one for its operation.
    pub fn register(&mut self, descriptor: OperationDescriptor) {
        self.descriptors.insert(descriptor.operation, descriptor);
    }

    /// Look up an operation by name.
    ///
    /// # Errors
    /// `UnknownOperation` if the name is not a known operation or no
    /// descriptor is registered for it.
    pub fn describe(&self, name: &str) -> Result<&OperationDescriptor> {
        let operation = Operation::from_str(name)
            .map_err(|_| MarkusError::UnknownOperation(name.to_string()))?;
        self.get(operation)
    }

    /// Look up a descriptor by operation.
    pub fn get(&self, operation: Operation) -> Result<&OperationDescriptor> {
        self.descriptors
            .get(&operation)
            .ok_or_else(|| MarkusError::UnknownOperation(operation.to_string()))
    }

    /// Check if a descriptor is registered for an operation.
    #[must_use]
    pub fn contains(&self, operation: Operation) -> bool {
        self.descriptors.contains_key(&operation)
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
