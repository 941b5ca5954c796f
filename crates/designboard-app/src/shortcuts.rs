//! Keyboard and pointer shortcut reference.

/// A shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, shift: bool, description: &'static str) -> Self {
        Self { key, shift, description }
    }

    /// Format the shortcut for display (e.g., "Shift+Click").
    pub fn format(&self) -> String {
        if self.shift {
            format!("Shift+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Click", false, "Select element"),
            Shortcut::new("Click", true, "Add or remove element from selection"),
            Shortcut::new("Drag", false, "Move selected elements"),
            Shortcut::new("Drag corner", false, "Resize selected element"),
            Shortcut::new("Double click", false, "Edit text in place"),
            Shortcut::new("Arrow keys", false, "Nudge selection by 5px"),
            Shortcut::new("Delete", false, "Delete selection"),
            Shortcut::new("Backspace", false, "Delete selection"),
            Shortcut::new("Enter", false, "Commit text edit"),
            Shortcut::new("Escape", false, "Cancel text edit"),
        ]
    }

    /// One line per shortcut, key column padded.
    pub fn describe() -> String {
        let shortcuts = Self::all();
        let width = shortcuts.iter().map(|s| s.format().len()).max().unwrap_or(0);
        shortcuts
            .iter()
            .map(|s| format!("{:width$}  {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Click", true, "").format(), "Shift+Click");
        assert_eq!(Shortcut::new("Delete", false, "").format(), "Delete");
    }

    #[test]
    fn test_describe_lists_every_shortcut() {
        let text = ShortcutRegistry::describe();
        assert_eq!(text.lines().count(), ShortcutRegistry::all().len());
        assert!(text.contains("Shift+Click"));
    }
}
