//! Single-line text input.

/// Character shown in place of each character of a masked field.
const MASK_CHAR: char = '•';

/// A labelled single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    label: &'static str,
    placeholder: &'static str,
    value: String,
    masked: bool,
}

impl TextField {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            masked: false,
        }
    }

    /// Input whose contents are hidden when displayed.
    pub fn masked(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label, placeholder)
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Text to show: the placeholder when empty, the mask when masked.
    pub fn display(&self) -> String {
        if self.value.is_empty() {
            self.placeholder.to_string()
        } else if self.masked {
            MASK_CHAR.to_string().repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
