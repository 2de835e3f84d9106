//! Provenance attached to every emitted record

/// Sentinel used when a document has no metadata entry
pub const UNKNOWN: &str = "unknown";

/// License and source label of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// License the source text is published under
    pub license: String,

    /// Human-readable source label (publisher, URL, collection)
    pub source: String,
}

impl Provenance {
    /// Create a new provenance pair
    pub fn new(license: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            source: source.into(),
        }
    }

    /// Provenance for a document without a metadata entry
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// True when both fields carry the sentinel
    pub fn is_unknown(&self) -> bool {
        self.license == UNKNOWN && self.source == UNKNOWN
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let p = Provenance::default();
        assert!(p.is_unknown());
        assert_eq!(p.license, "unknown");

        let p = Provenance::new("CC-BY-4.0", "wikibooks");
        assert!(!p.is_unknown());
    }
}
