//! Storage key definitions
//!
//! Instrumented methods are identified by a qualified name such as
//! `Cache.store`. Every key the instrumentation writes is derived from it.

use std::fmt;

/// Qualified identity of an instrumented method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    qualified: String,
}

impl MethodKey {
    /// Build from owner type and method name: `Cache` + `store` → `Cache.store`
    pub fn new(owner: &str, method: &str) -> Self {
        Self {
            qualified: format!("{}.{}", owner, method),
        }
    }

    /// The qualified name, e.g. `Cache.store`
    pub fn as_str(&self) -> &str {
        &self.qualified
    }

    /// Key of the persisted invocation counter (the bare qualified name)
    pub fn counter_key(&self) -> String {
        self.qualified.clone()
    }

    /// Key of the recorded-arguments list
    /// Format: `<method>:inputs`
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.qualified)
    }

    /// Key of the recorded-results list
    /// Format: `<method>:outputs`
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.qualified)
    }
}

impl From<&str> for MethodKey {
    fn from(qualified: &str) -> Self {
        Self {
            qualified: qualified.to_string(),
        }
    }
}

impl From<String> for MethodKey {
    fn from(qualified: String) -> Self {
        Self { qualified }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_key_creation() {
        let key = MethodKey::new("Cache", "store");
        assert_eq!(key.as_str(), "Cache.store");
        assert_eq!(key, MethodKey::from("Cache.store"));
    }

    #[test]
    fn test_derived_keys() {
        let key = MethodKey::new("Cache", "store");
        assert_eq!(key.counter_key(), "Cache.store");
        assert_eq!(key.inputs_key(), "Cache.store:inputs");
        assert_eq!(key.outputs_key(), "Cache.store:outputs");
    }

    #[test]
    fn test_history_keys_share_prefix() {
        let key = MethodKey::new("Cache", "store");
        let prefix = format!("{}:", key);
        assert!(key.inputs_key().starts_with(&prefix));
        assert!(key.outputs_key().starts_with(&prefix));
        assert_ne!(key.inputs_key(), key.outputs_key());
    }
}
