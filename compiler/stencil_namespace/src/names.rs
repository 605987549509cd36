//! Reserved names used for special dispatch.
//!
//! These are plain constants; nothing here is mutable global state. The rule
//! for private names in a [`SingleScopeView`](crate::SingleScopeView) is kept
//! in a `ViewConfig` so embedders can choose their own prefix.

/// Stack field holding the template nesting depth.
pub const LEVEL_FIELD: &str = "level";

/// Read-only stack field holding the number of pushed sources. An overflow
/// field of the same name shadows it.
pub const DEPTH_FIELD: &str = "depth";

/// Overflow field a top-level render stores the client object under.
pub const THIS_FIELD: &str = "this";

/// Default prefix of names a view never resolves.
pub const DEFAULT_PRIVATE_PREFIX: &str = "_";

/// Default key requesting the string form of a view's target.
pub const STRING_FORM_KEY: &str = "__str__";

/// How a view treats a key before consulting its accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyClass {
    /// Resolved through the accessor.
    Public,
    /// Answered with the target's string form.
    StringForm,
    /// Always missing.
    Private,
}

/// Reserved-name rules for single-scope views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewConfig {
    /// Names starting with this prefix are private; `None` disables the rule.
    private_prefix: Option<String>,
    string_form_key: String,
}

impl ViewConfig {
    pub fn new() -> Self {
        ViewConfig {
            private_prefix: Some(DEFAULT_PRIVATE_PREFIX.to_owned()),
            string_form_key: STRING_FORM_KEY.to_owned(),
        }
    }

    #[must_use]
    pub fn with_private_prefix(mut self, prefix: Option<&str>) -> Self {
        self.private_prefix = prefix.filter(|p| !p.is_empty()).map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_string_form_key(mut self, key: &str) -> Self {
        key.clone_into(&mut self.string_form_key);
        self
    }

    pub fn private_prefix(&self) -> Option<&str> {
        self.private_prefix.as_deref()
    }

    pub fn string_form_key(&self) -> &str {
        &self.string_form_key
    }

    /// Classify a key. Only keys carrying the private prefix are special;
    /// among them, the string-form key is the single exception.
    pub fn classify(&self, key: &str) -> KeyClass {
        match &self.private_prefix {
            Some(prefix) if key.starts_with(prefix.as_str()) => {
                if key == self.string_form_key {
                    KeyClass::StringForm
                } else {
                    KeyClass::Private
                }
            }
            _ => KeyClass::Public,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new()
    }
}
