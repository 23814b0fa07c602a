use derive_more::Display;

/// One dose of a chemical, identified by its short code (e.g. `AA`).
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct Chemical(String);

impl Chemical {
    pub fn new<S: Into<String>>(code: S) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Chemical {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
