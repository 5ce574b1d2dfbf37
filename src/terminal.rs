//! The fake shell behind `/terminal` and the typed-out 404 transcript.

pub const BANNER: &[&str] = &[
    "Welcome to AbishaiOS v1.0.0",
    "Type 'help' for available commands.",
];

/// Delay between revealed characters of the 404 transcript.
pub const TYPE_INTERVAL_MS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// Leave the terminal for the home page.
    Exit,
}

fn respond(command: &str) -> Option<&'static str> {
    let response = match command {
        "help" => "Available commands: about, classified, skills, contact, clear, exit",
        "about" => "Abishai K C | AI Practitioner | Data Scientist. I turn coffee into loss function optimization.",
        "classified" => "🔐 [TOP SECRET] Project: 'Neuro-Genesis'\n> Status: In Development\n> Stack: PyTorch, Transformers, React\n> Description: An attempt to create a personal LLM assistant that runs entirely in the browser via WebGPU.",
        "skills" => "Python, TensorFlow, PyTorch, React, TypeScript, SQL, Git, Docker, AWS",
        "contact" => "abishaioff@gmail.com | linkedin.com/in/abishai-k-c",
        _ => return None,
    };
    Some(response)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalSession {
    history: Vec<String>,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self {
            history: BANNER.iter().map(ToString::to_string).collect(),
        }
    }
}

impl TerminalSession {
    pub fn run(&mut self, raw: &str) -> CommandOutcome {
        let command = raw.trim().to_lowercase();

        match command.as_str() {
            "clear" => {
                self.history.clear();
                CommandOutcome::Continue
            }
            "exit" => CommandOutcome::Exit,
            _ => {
                let response = respond(&command)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| format!("Command not found: {raw}"));
                self.history.push(format!("> {raw}"));
                self.history.push(response);
                CommandOutcome::Continue
            }
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

pub fn not_found_transcript(path: &str) -> String {
    format!(
        "> ANALYZING REQUEST...\n> ERROR: Route \"{path}\" not found in vector database.\n> HALLUCINATION PROTOCOL INITIATED...\n\nI am 99.9% confident that this page exists. It is definitely a detailed documentation of my secret project \"Project Zero\". \n\nWait... my safety filters are blocking this content. \n\n[SYSTEM MESSAGE]: The route \"/terminal\" has been redacted from public view. Do not click it."
    )
}

/// The first `chars` characters of `text`, cut on a character boundary.
pub fn typed_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_banner() {
        let session = TerminalSession::default();
        assert_eq!(session.history(), BANNER);
    }

    #[test]
    fn known_commands_echo_and_respond() {
        let mut session = TerminalSession::default();
        assert_eq!(session.run("  HELP "), CommandOutcome::Continue);

        let tail = &session.history()[2..];
        assert_eq!(tail[0], ">   HELP ");
        assert!(tail[1].starts_with("Available commands"));
    }

    #[test]
    fn unknown_command_keeps_raw_input() {
        let mut session = TerminalSession::default();
        session.run("sudo rm -rf /");
        assert_eq!(
            session.history().last().map(String::as_str),
            Some("Command not found: sudo rm -rf /")
        );
    }

    #[test]
    fn clear_and_exit() {
        let mut session = TerminalSession::default();
        session.run("skills");
        assert_eq!(session.run("clear"), CommandOutcome::Continue);
        assert!(session.history().is_empty());

        assert_eq!(session.run("Exit"), CommandOutcome::Exit);
        assert!(session.history().is_empty());
    }

    #[test]
    fn transcript_names_the_missing_route() {
        let transcript = not_found_transcript("/admin");
        assert!(transcript.contains("Route \"/admin\" not found"));
    }

    #[test]
    fn typed_prefix_respects_multibyte_characters() {
        assert_eq!(typed_prefix("🔐 key", 1), "🔐");
        assert_eq!(typed_prefix("abc", 0), "");
        assert_eq!(typed_prefix("abc", 10), "abc");
    }
}
