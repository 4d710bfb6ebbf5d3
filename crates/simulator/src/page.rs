use std::fmt;

use serde::{Deserialize, Serialize};

/// A page label from the reference string.
///
/// Pages carry no meaning beyond equality: `"7"` and `"07"` are different
/// pages. The label is kept exactly as it was tokenized so the trace echoes
/// the caller's input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    label: String,
}

impl Page {
    pub fn new(label: impl Into<String>) -> Page {
        Page {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<&str> for Page {
    fn from(label: &str) -> Self {
        Page::new(label)
    }
}

impl From<String> for Page {
    fn from(label: String) -> Self {
        Page::new(label)
    }
}

impl From<u32> for Page {
    fn from(number: u32) -> Self {
        Page::new(number.to_string())
    }
}

#[cfg(test)]
mod page_tests {
    use super::*;

    #[test]
    fn test_label() {
        let page = Page::new("A");
        assert_eq!("A", page.label());
        assert_eq!("A", page.to_string());
    }

    #[test]
    fn test_equals() {
        let a = Page::from("1");
        let a_copy = Page::from(1u32);
        let b = Page::from("01");

        assert_eq!(a, a_copy);
        assert_ne!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let page = Page::from("7");
        assert_eq!(serde_json::to_string(&page).unwrap(), "\"7\"");
    }
}
