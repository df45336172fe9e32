//! Case-insensitive header access.

use std::collections::HashMap;

/// Raw header snapshot as reported by the browser.
pub type Headers = HashMap<String, String>;

/// Header map with lower-cased names.
///
/// Built once per lookup site so that every field extraction afterwards is
/// a plain map access.
#[derive(Debug, Clone, Default)]
pub struct NormalizedHeaders {
    inner: HashMap<String, String>,
}

impl NormalizedHeaders {
    pub fn new(headers: &Headers) -> Self {
        let inner = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        Self { inner }
    }

    /// Look up a header by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.inner.get(name) {
            Some(value) => Some(value.as_str()),
            None => self
                .inner
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
        }
    }

    /// Owned copy of a header value, for the public timing fields.
    pub fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&Headers> for NormalizedHeaders {
    fn from(headers: &Headers) -> Self {
        Self::new(headers)
    }
}
