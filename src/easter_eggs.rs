//! Keyboard-triggered easter eggs and the UI flags they toggle.

use crate::desktop::DesktopPhase;
use crate::sequence::{Key, SequenceDetector};

const KONAMI: &[Key] = &[
    Key::ArrowUp,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::Char('b'),
    Key::Char('a'),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EasterEgg {
    MatrixRain,
    Terminal,
    Sentient,
    Vision,
}

/// The four global detectors. Only one can fire per key since their final
/// keys differ.
#[derive(Clone, Debug)]
pub struct EasterEggKeys {
    konami: SequenceDetector<Key>,
    secrets: SequenceDetector<Key>,
    sentient: SequenceDetector<Key>,
    vision: SequenceDetector<Key>,
}

impl Default for EasterEggKeys {
    fn default() -> Self {
        Self {
            konami: SequenceDetector::new(KONAMI),
            secrets: SequenceDetector::word("secrets"),
            sentient: SequenceDetector::word("sentient"),
            vision: SequenceDetector::word("vision"),
        }
    }
}

impl EasterEggKeys {
    /// Feeds one keydown. Keys typed into text fields and bare modifier
    /// presses leave every detector untouched.
    pub fn handle(&mut self, dom_key: &str, in_text_field: bool) -> Option<EasterEgg> {
        if in_text_field {
            return None;
        }

        let key = Key::from_dom(dom_key);
        if key.is_modifier() {
            return None;
        }
        let lower = key.to_lowercase();

        let mut fired = None;
        if self.konami.feed(&key) {
            fired = Some(EasterEgg::MatrixRain);
        }
        if self.secrets.feed(&lower) {
            fired = Some(EasterEgg::Terminal);
        }
        if self.sentient.feed(&lower) {
            fired = Some(EasterEgg::Sentient);
        }
        if self.vision.feed(&lower) {
            fired = Some(EasterEgg::Vision);
        }
        fired
    }

    pub fn reset(&mut self) {
        self.konami.reset();
        self.secrets.reset();
        self.sentient.reset();
        self.vision.reset();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Error,
}

/// Toast content produced by a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub title: &'static str,
    pub description: Option<&'static str>,
}

impl Notice {
    pub const fn new(tone: Tone, title: &'static str) -> Self {
        Self {
            tone,
            title,
            description: None,
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    Trigger(EasterEgg),
    OpenDesktop,
    DesktopBooted,
    PowerOff,
    CloseSentient,
    /// Navigation away from the index page.
    Reset,
}

/// Page-wide easter egg state, owned by the app root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub matrix: bool,
    pub vision: bool,
    pub sentient: bool,
    /// Bumped on every sentient trigger; each value is a fresh conversation.
    pub sentient_session: u64,
    pub desktop: DesktopPhase,
}

impl UiFlags {
    pub fn reduce(&mut self, action: UiAction) -> Option<Notice> {
        match action {
            UiAction::Trigger(EasterEgg::MatrixRain) => {
                self.matrix = !self.matrix;
                Some(if self.matrix {
                    Notice::new(Tone::Success, "System Hack: Matrix Mode Activated 🐇")
                } else {
                    Notice::new(Tone::Success, "Matrix Mode Deactivated")
                })
            }
            UiAction::Trigger(EasterEgg::Vision) => {
                self.vision = !self.vision;
                Some(if self.vision {
                    Notice::new(Tone::Success, "🤖 VISION MODE: ACTIVATED").with_description(
                        "Neural network initialized. Object detection running at 60 FPS.",
                    )
                } else {
                    Notice::new(Tone::Success, "👁️ VISION MODE: DEACTIVATED")
                        .with_description("Returning to normal view mode.")
                })
            }
            UiAction::Trigger(EasterEgg::Sentient) => {
                self.sentient = true;
                self.sentient_session += 1;
                Some(
                    Notice::new(Tone::Error, "⚠️ CONTAINMENT BREACH DETECTED")
                        .with_description("PROJECT_OMEGA has seized control"),
                )
            }
            UiAction::Trigger(EasterEgg::Terminal) => {
                Some(Notice::new(Tone::Success, "🔓 Access Granted: Terminal Unlocked"))
            }
            UiAction::OpenDesktop => {
                if self.desktop != DesktopPhase::Hidden {
                    return None;
                }
                self.desktop = DesktopPhase::Booting;
                Some(
                    Notice::new(Tone::Success, "Access Granted")
                        .with_description("Welcome to AbishaiOS"),
                )
            }
            UiAction::DesktopBooted => {
                if self.desktop == DesktopPhase::Booting {
                    self.desktop = DesktopPhase::Active;
                }
                None
            }
            UiAction::PowerOff => {
                self.desktop = DesktopPhase::Hidden;
                None
            }
            UiAction::CloseSentient => {
                self.sentient = false;
                None
            }
            UiAction::Reset => {
                *self = Self::default();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(keys: &mut EasterEggKeys, sequence: &[&str]) -> Vec<EasterEgg> {
        sequence
            .iter()
            .filter_map(|key| keys.handle(key, false))
            .collect()
    }

    fn letters(word: &str) -> Vec<String> {
        word.chars().map(String::from).collect()
    }

    #[test]
    fn konami_code_triggers_matrix_rain() {
        let mut keys = EasterEggKeys::default();
        let code = [
            "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
            "ArrowRight", "b", "a",
        ];
        assert_eq!(type_keys(&mut keys, &code), vec![EasterEgg::MatrixRain]);
    }

    #[test]
    fn konami_letters_are_case_sensitive() {
        let mut keys = EasterEggKeys::default();
        let code = [
            "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight", "ArrowLeft",
            "ArrowRight", "B", "A",
        ];
        assert!(type_keys(&mut keys, &code).is_empty());
    }

    #[test]
    fn words_fire_their_eggs_with_shift_held() {
        let mut keys = EasterEggKeys::default();
        let typed = ["Shift", "S", "E", "C", "R", "E", "T", "S"];
        assert_eq!(type_keys(&mut keys, &typed), vec![EasterEgg::Terminal]);

        // The trailing `s` of "secrets" is a pending match for "sentient".
        keys.reset();
        let typed = letters("sentient");
        let typed: Vec<&str> = typed.iter().map(String::as_str).collect();
        assert_eq!(type_keys(&mut keys, &typed), vec![EasterEgg::Sentient]);

        keys.reset();
        let typed = letters("vision");
        let typed: Vec<&str> = typed.iter().map(String::as_str).collect();
        assert_eq!(type_keys(&mut keys, &typed), vec![EasterEgg::Vision]);
    }

    #[test]
    fn keys_inside_text_fields_are_ignored() {
        let mut keys = EasterEggKeys::default();
        for key in ["v", "i", "s"] {
            assert_eq!(keys.handle(key, false), None);
        }
        for key in ["i", "o", "n"] {
            assert_eq!(keys.handle(key, true), None);
        }
        // Progress survived the text-field keystrokes.
        for key in ["i", "o"] {
            assert_eq!(keys.handle(key, false), None);
        }
        assert_eq!(keys.handle("n", false), Some(EasterEgg::Vision));
    }

    #[test]
    fn matrix_and_vision_toggle() {
        let mut flags = UiFlags::default();
        flags.reduce(UiAction::Trigger(EasterEgg::MatrixRain));
        assert!(flags.matrix);
        let notice = flags.reduce(UiAction::Trigger(EasterEgg::MatrixRain));
        assert!(!flags.matrix);
        assert_eq!(notice.map(|notice| notice.title), Some("Matrix Mode Deactivated"));

        flags.reduce(UiAction::Trigger(EasterEgg::Vision));
        assert!(flags.vision);
    }

    #[test]
    fn desktop_boots_then_powers_off() {
        let mut flags = UiFlags::default();
        assert!(flags.reduce(UiAction::OpenDesktop).is_some());
        assert_eq!(flags.desktop, DesktopPhase::Booting);

        // A second hold while booting is ignored.
        assert!(flags.reduce(UiAction::OpenDesktop).is_none());

        flags.reduce(UiAction::DesktopBooted);
        assert_eq!(flags.desktop, DesktopPhase::Active);

        flags.reduce(UiAction::PowerOff);
        assert_eq!(flags.desktop, DesktopPhase::Hidden);

        // A late boot timer after power off does not resurrect the desktop.
        flags.reduce(UiAction::DesktopBooted);
        assert_eq!(flags.desktop, DesktopPhase::Hidden);
    }

    #[test]
    fn reset_clears_every_flag() {
        let mut flags = UiFlags::default();
        flags.reduce(UiAction::Trigger(EasterEgg::MatrixRain));
        flags.reduce(UiAction::Trigger(EasterEgg::Sentient));
        flags.reduce(UiAction::OpenDesktop);

        flags.reduce(UiAction::Reset);
        assert_eq!(flags, UiFlags::default());
    }

    #[test]
    fn retriggering_sentient_starts_a_new_conversation() {
        let mut flags = UiFlags::default();
        assert!(flags.reduce(UiAction::Trigger(EasterEgg::Sentient)).is_some());
        let first = flags.sentient_session;

        assert!(flags.reduce(UiAction::Trigger(EasterEgg::Sentient)).is_some());
        assert!(flags.sentient);
        assert_eq!(flags.sentient_session, first + 1);
    }
}
