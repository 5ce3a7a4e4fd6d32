use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css:{s}"),
            Locator::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// What a live element lookup returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveRead {
    /// Rendered text of the element, trimmed.
    pub text: String,
    /// Value of the requested attribute, if one was asked for and present.
    pub attribute: Option<String>,
}
