//! Indexer configuration.

/// Namespace prefix used when none is configured explicitly.
pub const DEFAULT_NAMESPACE: &str = "http://jgraph.dev/java/1.0";

/// Settings for one ingestion session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexerConfig {
    /// Prefix of every identifier the session writes. `None` writes
    /// unprefixed identifiers.
    pub namespace: Option<String>,
    /// Packages wildcard-imported into every compilation unit, after the
    /// unit's own wildcard imports.
    pub implicit_wildcards: Vec<String>,
    /// Report declared-vs-scope package mismatches to listeners.
    pub check_package_discrepancy: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            namespace: Some(DEFAULT_NAMESPACE.to_string()),
            implicit_wildcards: vec!["java.lang".to_string()],
            check_package_discrepancy: true,
        }
    }
}

impl IndexerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn without_namespace(mut self) -> Self {
        self.namespace = None;
        self
    }

    pub fn with_implicit_wildcards<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implicit_wildcards = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_package_check(mut self, enabled: bool) -> Self {
        self.check_package_discrepancy = enabled;
        self
    }
}
