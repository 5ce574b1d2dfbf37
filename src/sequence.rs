//! Fixed-sequence keystroke matching.
//!
//! A [`SequenceDetector`] keeps only the index of the next expected key. A
//! mismatch resets the index to zero without re-testing the mismatched key
//! against the start of the sequence, so overlapping prefixes are not
//! recovered: feeding `s s e c r e t s` to the `secrets` detector never fires.

/// A normalized keyboard symbol, built from the DOM `KeyboardEvent.key` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Modifier,
    Other,
}

impl Key {
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Self::Char(ch);
        }

        match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Shift" | "Control" | "Alt" | "AltGraph" | "Meta" | "CapsLock" | "Fn" | "OS" => {
                Self::Modifier
            }
            _ => Self::Other,
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Modifier)
    }

    /// Lowercases character keys; named keys pass through.
    pub fn to_lowercase(&self) -> Self {
        match self {
            Self::Char(ch) => Self::Char(ch.to_lowercase().next().unwrap_or(*ch)),
            other => other.clone(),
        }
    }
}

/// Fires once every time the full target sequence is typed without a miss.
#[derive(Clone, Debug)]
pub struct SequenceDetector<K> {
    target: Vec<K>,
    index: usize,
}

impl<K: PartialEq> SequenceDetector<K> {
    pub fn new(target: impl Into<Vec<K>>) -> Self {
        Self {
            target: target.into(),
            index: 0,
        }
    }

    /// Advances on a match, resets on a miss. Returns true on full match.
    pub fn feed(&mut self, key: &K) -> bool {
        let Some(expected) = self.target.get(self.index) else {
            self.index = 0;
            return false;
        };

        if key != expected {
            self.index = 0;
            return false;
        }

        self.index += 1;
        if self.index == self.target.len() {
            self.index = 0;
            return true;
        }

        false
    }

    /// Number of keys matched so far.
    pub fn progress(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl SequenceDetector<Key> {
    /// Detector for a lowercase word typed one character per key.
    pub fn word(word: &str) -> Self {
        Self::new(
            word.chars()
                .flat_map(char::to_lowercase)
                .map(Key::Char)
                .collect::<Vec<_>>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_word(detector: &mut SequenceDetector<Key>, text: &str) -> usize {
        text.chars()
            .filter(|ch| detector.feed(&Key::Char(*ch)))
            .count()
    }

    #[test]
    fn exact_sequence_fires_once() {
        let mut detector = SequenceDetector::word("secrets");
        assert_eq!(feed_word(&mut detector, "secrets"), 1);
        assert_eq!(detector.progress(), 0);
    }

    #[test]
    fn wrong_key_at_any_position_resets_progress() {
        for position in 0..7 {
            let mut detector = SequenceDetector::word("secrets");
            let typed: String = "secrets".chars().take(position).collect();
            feed_word(&mut detector, &typed);
            assert_eq!(detector.progress(), position);

            assert!(!detector.feed(&Key::Char('x')));
            assert_eq!(detector.progress(), 0);
        }
    }

    #[test]
    fn mismatch_does_not_rematch_the_first_key() {
        let mut detector = SequenceDetector::word("secrets");
        assert_eq!(feed_word(&mut detector, "ssecrets"), 0);

        // Only the trailing `s` is pending after the reset swallowed the second one.
        assert_eq!(detector.progress(), 1);
        assert_eq!(feed_word(&mut detector, "ecrets"), 1);
    }

    #[test]
    fn repeated_sequences_fire_each_time() {
        let mut detector = SequenceDetector::word("vision");
        assert_eq!(feed_word(&mut detector, "visionvision"), 2);
    }

    #[test]
    fn named_keys_are_normalized() {
        assert_eq!(Key::from_dom("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_dom("b"), Key::Char('b'));
        assert_eq!(Key::from_dom("Shift"), Key::Modifier);
        assert_eq!(Key::from_dom("Enter"), Key::Other);
        assert_eq!(Key::from_dom("S").to_lowercase(), Key::Char('s'));
        assert_eq!(Key::ArrowLeft.to_lowercase(), Key::ArrowLeft);
    }

    #[test]
    fn empty_target_never_fires() {
        let mut detector: SequenceDetector<Key> = SequenceDetector::new(Vec::new());
        assert!(!detector.feed(&Key::Char('a')));
        assert_eq!(detector.progress(), 0);
    }
}
