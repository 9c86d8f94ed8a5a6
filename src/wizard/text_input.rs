//! Single-line text buffer used by the input prompts

use crate::messaging::KeyInput;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an editing key. Returns false for keys that aren't edits.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) if !c.is_control() => {
                self.value.push(c);
                true
            }
            KeyInput::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Return the contents and clear the buffer
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new();
        for c in "12:0x".chars() {
            assert!(input.apply(KeyInput::Char(c)));
        }
        assert!(input.apply(KeyInput::Backspace));
        assert_eq!(input.value(), "12:0");

        assert!(!input.apply(KeyInput::Enter));
        assert!(!input.apply(KeyInput::Up));
        assert_eq!(input.take(), "12:0");
        assert!(input.is_empty());
    }

    #[test]
    fn test_backspace_on_empty() {
        let mut input = TextInput::new();
        assert!(input.apply(KeyInput::Backspace));
        assert!(input.is_empty());
    }
}
