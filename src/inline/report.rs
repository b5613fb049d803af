//! Summary of an inlining run.

use serde::Serialize;

use crate::model::ResourceReference;

/// What happened during one run of the inliner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineReport {
    /// Number of input lines read
    pub lines: usize,

    /// Resources inlined, in order of first use
    pub inlined: Vec<ResourceReference>,

    /// Directives dropped because their resource was already present
    pub duplicates: usize,

    /// Directives passed through because their resource could not be found
    pub missing: Vec<ResourceReference>,

    /// Resources found already embedded in the input
    pub embedded: Vec<ResourceReference>,

    /// Resources listed in `%%DocumentNeededResources`, which is left as is
    pub needed: Vec<ResourceReference>,
}

impl InlineReport {
    /// Whether every directive was resolved.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceType;

    #[test]
    fn test_report_json() {
        let report = InlineReport {
            lines: 3,
            inlined: vec![ResourceReference::new(ResourceType::Font, "Helvetica")],
            duplicates: 1,
            ..Default::default()
        };
        assert!(report.is_complete());

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["lines"], 3);
        assert_eq!(value["duplicates"], 1);
        assert_eq!(value["inlined"][0]["type"], "font");
        assert_eq!(value["inlined"][0]["name"], "Helvetica");
        assert!(value["missing"].as_array().unwrap().is_empty());
    }
}
