//! Inlining options and configuration.

/// Options for an inlining run.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// What to do when a resource cannot be found
    pub missing: MissingResource,

    /// Treat `%%BeginResource` blocks already in the input as inlined
    pub record_embedded: bool,
}

impl InlineOptions {
    /// Create new inline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set missing-resource handling.
    pub fn with_missing(mut self, missing: MissingResource) -> Self {
        self.missing = missing;
        self
    }

    /// Fail the run on the first missing resource.
    pub fn strict(mut self) -> Self {
        self.missing = MissingResource::Fail;
        self
    }

    /// Enable or disable recording of resources already embedded in the input.
    pub fn with_record_embedded(mut self, record: bool) -> Self {
        self.record_embedded = record;
        self
    }
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            missing: MissingResource::Passthrough,
            record_embedded: true,
        }
    }
}

/// Handling of `%%IncludeResource` directives that cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingResource {
    /// Keep the directive unchanged and log a warning
    #[default]
    Passthrough,
    /// Abort the run with an error
    Fail,
}
