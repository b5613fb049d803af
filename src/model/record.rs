//! Set of resources already present in the output of a run.

use std::collections::HashSet;

use super::{ResourceReference, ResourceType};

/// Resources already inlined (or found embedded) during one run.
///
/// Keys are `(type, name)`; insertion order is kept for reporting.
#[derive(Debug, Clone, Default)]
pub struct ResourceRecord {
    seen: HashSet<(ResourceType, String)>,
    order: Vec<ResourceReference>,
}

impl ResourceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a resource with the same type and name has been recorded.
    pub fn contains(&self, reference: &ResourceReference) -> bool {
        let (resource_type, name) = reference.key();
        self.seen.contains(&(resource_type, name.to_owned()))
    }

    /// Record a resource. Returns `false` if it was already present.
    pub fn insert(&mut self, reference: &ResourceReference) -> bool {
        let (resource_type, name) = reference.key();
        let inserted = self.seen.insert((resource_type, name.to_owned()));
        if inserted {
            self.order.push(reference.clone());
        }
        inserted
    }

    /// Number of recorded resources.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Recorded resources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceReference> {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_keyed_by_type_and_name() {
        let mut record = ResourceRecord::new();
        assert!(record.is_empty());

        let v1 = ResourceReference::new(ResourceType::ProcSet, "P").with_version("1.0");
        let v2 = ResourceReference::new(ResourceType::ProcSet, "P").with_version("2.0");
        let font = ResourceReference::new(ResourceType::Font, "P");

        assert!(record.insert(&v1));
        assert!(!record.insert(&v2));
        assert!(record.contains(&v2));
        assert!(!record.contains(&font));
        assert!(record.insert(&font));

        assert_eq!(record.len(), 2);
        let names: Vec<_> = record.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["procset P 1.0", "font P"]);
    }
}
