//! Resource types and references parsed from DSC comments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locator::sanitize_file_name;

/// Type of a DSC resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Font program
    Font,
    /// Procedure set
    ProcSet,
    /// Pattern
    Pattern,
    /// Generic file
    File,
    /// Encoding vector
    Encoding,
    /// Form
    Form,
}

impl ResourceType {
    /// Parse a DSC resource type keyword (`font`, `procset`, ...).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "font" => Some(ResourceType::Font),
            "procset" => Some(ResourceType::ProcSet),
            "pattern" => Some(ResourceType::Pattern),
            "file" => Some(ResourceType::File),
            "encoding" => Some(ResourceType::Encoding),
            "form" => Some(ResourceType::Form),
            _ => None,
        }
    }

    /// The DSC keyword for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Font => "font",
            ResourceType::ProcSet => "procset",
            ResourceType::Pattern => "pattern",
            ResourceType::File => "file",
            ResourceType::Encoding => "encoding",
            ResourceType::Form => "form",
        }
    }

    /// File extensions to try, most specific first.
    ///
    /// The first entry is the extension `extractres` gives the files it
    /// writes; the empty extension (bare resource name) always comes last.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ResourceType::Font => &[".pfa", ".gsf", ""],
            ResourceType::ProcSet => &[".ps", ".pro", ""],
            ResourceType::Pattern => &[".pat", ""],
            ResourceType::File => &[".ps", ".eps", ""],
            ResourceType::Encoding => &[".enc", ""],
            ResourceType::Form => &[".frm", ""],
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a resource, as named by `%%IncludeResource` or
/// `%%BeginResource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceReference {
    /// Resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Resource name (e.g. `Helvetica`)
    pub name: String,

    /// Version, for procsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Revision, for procsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ResourceReference {
    /// Create a reference without version information.
    pub fn new(resource_type: ResourceType, name: impl Into<String>) -> Self {
        Self {
            resource_type,
            name: name.into(),
            version: None,
            revision: None,
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the revision.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Parse a full DSC argument list: `<type> <name> [<version> [<revision>]]`.
    ///
    /// Returns `None` for an unknown type or an unusable argument list.
    pub fn parse(args: &str) -> Option<Self> {
        let mut tokens = args.split_whitespace();
        let resource_type = ResourceType::from_keyword(tokens.next()?)?;
        Self::parse_typed(resource_type, tokens.collect::<Vec<_>>().join(" ").as_str())
    }

    /// Parse `<name> [<version> [<revision>]]` for a type already known,
    /// as in the legacy `%%BeginFont:` and `%%BeginProcSet:` comments.
    pub fn parse_typed(resource_type: ResourceType, args: &str) -> Option<Self> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let (name, rest) = tokens.split_first()?;
        if rest.len() > 2 || sanitize_file_name(name).is_empty() {
            return None;
        }

        Some(Self {
            resource_type,
            name: (*name).to_string(),
            version: rest.first().map(|v| v.to_string()),
            revision: rest.get(1).map(|r| r.to_string()),
        })
    }

    /// Deduplication key: type and name, ignoring version information.
    pub fn key(&self) -> (ResourceType, &str) {
        (self.resource_type, &self.name)
    }

    /// Name, version and revision, in DSC order.
    pub fn components(&self) -> Vec<&str> {
        let mut components = vec![self.name.as_str()];
        components.extend(self.version.as_deref());
        components.extend(self.revision.as_deref());
        components
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.resource_type, self.components().join(" "))
    }
}
