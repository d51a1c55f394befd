//! Types for the operation description registry.

use reqwest::Method;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::binder::ParameterRule;
use crate::normalize::{Field, ItemsSpec, Shape};

/// Operations supported by the Markus API.
///
/// Names render and parse in camelCase (`articleCategories`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    /// Theatre areas (cities and single theatres).
    Areas,
    /// Languages content is published in.
    Languages,
    /// News article categories.
    ArticleCategories,
    /// News articles.
    Articles,
    /// Movies and other events.
    Events,
    /// Shows (screenings) for a period.
    Shows,
    /// Dates that have shows.
    Schedule,
}

impl Operation {
    /// Name used for registry lookups.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Immutable description of one API operation.
///
/// Holds everything needed to issue the request and read the response:
/// the HTTP binding, the parameter rules and the result shape.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Operation this descriptor belongs to.
    pub operation: Operation,

    /// HTTP method. The Markus API is read-only.
    pub method: Method,

    /// Path relative to the base URL (e.g., "Events/").
    pub path: String,

    /// Parameter rules, in wire order.
    pub parameters: Vec<ParameterRule>,

    /// Path of the result root; the first segment names the document element.
    pub root: String,

    /// Top-level scalar fields read from the result root.
    pub metadata: Vec<Field>,

    /// Repeating elements that become `items`.
    pub items: ItemsSpec,
}

impl OperationDescriptor {
    /// Create a descriptor with no parameters and no items.
    #[must_use]
    pub fn new(operation: Operation, path: impl Into<String>) -> Self {
        Self {
            operation,
            method: Method::GET,
            path: path.into(),
            parameters: Vec::new(),
            root: String::new(),
            metadata: Vec::new(),
            items: ItemsSpec::new("", Shape::flat(Vec::<Field>::new())),
        }
    }

    /// Set the parameter rules.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ParameterRule>) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }

    /// Set the result root path.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the top-level metadata fields.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl IntoIterator<Item = Field>) -> Self {
        self.metadata = metadata.into_iter().collect();
        self
    }

    /// Set the item specification.
    #[must_use]
    pub fn with_items(mut self, items: ItemsSpec) -> Self {
        self.items = items;
        self
    }

    /// Wire keys this operation can send, in order.
    #[must_use]
    pub fn wire_keys(&self) -> Vec<&str> {
        self.parameters.iter().map(ParameterRule::wire_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::ArticleCategories.to_string(), "articleCategories");
        assert_eq!(Operation::Areas.as_str(), "areas");
        assert_eq!(Operation::from_str("shows").ok(), Some(Operation::Shows));
        assert!(Operation::from_str("films").is_err());
    }

    #[test]
    fn test_operation_count() {
        assert_eq!(Operation::iter().count(), 7);
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = OperationDescriptor::new(Operation::Areas, "TheatreAreas/");
        assert_eq!(descriptor.method, Method::GET);
        assert!(descriptor.parameters.is_empty());
        assert!(descriptor.wire_keys().is_empty());
    }
}
