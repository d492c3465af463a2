//! Presentation-facing state.
//!
//! The engine publishes an [`EditorView`] after every change; a UI renders
//! the paths as chips (only aliases removable) and a warning when the
//! parent graph is cyclic. [`AliasDraft`] holds the alias being typed.

/// Snapshot published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorView {
    /// Current path list, primary first.
    pub paths: Vec<String>,
    /// Possible cyclic redundancy of relationships.
    pub cyclic: bool,
}

/// One rendered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip<'a> {
    pub path: &'a str,
    pub removable: bool,
}

impl EditorView {
    /// Paths as chips; the primary path at index 0 cannot be removed.
    pub fn chips(&self) -> impl Iterator<Item = Chip<'_>> {
        self.paths.iter().enumerate().map(|(i, path)| Chip {
            path,
            removable: i > 0,
        })
    }

    pub fn primary(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }
}

/// Text typed into the alias entry control.
///
/// Validation failures keep the text and flag it invalid; any further
/// edit clears the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasDraft {
    text: String,
    invalid: bool,
}

impl AliasDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the typed text.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalid = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub(crate) fn reject(&mut self) {
        self.invalid = true;
    }

    pub(crate) fn accept(&mut self) {
        self.text.clear();
        self.invalid = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chips_protect_primary() {
        let view = EditorView {
            paths: vec!["/products/widget".to_string(), "/old".to_string()],
            cyclic: false,
        };
        let chips: Vec<_> = view.chips().collect();
        assert_eq!(
            chips,
            [
                Chip {
                    path: "/products/widget",
                    removable: false
                },
                Chip {
                    path: "/old",
                    removable: true
                },
            ]
        );
        assert_eq!(view.primary(), Some("/products/widget"));
    }

    #[test]
    fn test_draft_flags() {
        let mut draft = AliasDraft::new();
        draft.edit("foo");
        draft.reject();
        assert!(draft.is_invalid());
        assert_eq!(draft.text(), "foo");

        draft.edit("/foo");
        assert!(!draft.is_invalid());

        draft.accept();
        assert_eq!(draft.text(), "");
    }
}
