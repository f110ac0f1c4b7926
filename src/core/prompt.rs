use std::io::{BufRead, IsTerminal, Write};

/// Interactive confirmation gate. Falls back to the question's default
/// answer when stdin is not a terminal or interactivity was switched off
/// (e.g. `--yes` skips the prompt by pre-answering it).
pub struct PromptEngine {
    interactive: bool,
    assume_yes: bool,
}

impl PromptEngine {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
            assume_yes: false,
        }
    }

    pub fn with_interactive(interactive: bool) -> Self {
        Self {
            interactive,
            assume_yes: false,
        }
    }

    /// Every yes/no question answers yes without prompting.
    pub fn assume_yes() -> Self {
        Self {
            interactive: false,
            assume_yes: true,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Print an informational line to stderr, keeping stdout free for
    /// structured output.
    pub fn message(&self, text: &str) {
        eprintln!("{}", text);
    }

    /// Ask a yes/no question. Non-interactive sessions get `default`
    /// (or yes when pre-answered).
    pub fn yes_no(&self, question: &str, default: bool) -> bool {
        if self.assume_yes {
            return true;
        }
        if !self.interactive {
            return default;
        }

        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        eprint!("{} {} ", question, suffix);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return default;
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            "" => default,
            _ => default,
        }
    }

    /// Show a summary block, then ask for confirmation.
    pub fn confirm_summary(&self, lines: &[String], question: &str, default: bool) -> bool {
        for line in lines {
            self.message(line);
        }
        self.yes_no(question, default)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_returns_default() {
        let prompt = PromptEngine::with_interactive(false);
        assert!(!prompt.yes_no("Proceed?", false));
        assert!(prompt.yes_no("Proceed?", true));
    }

    #[test]
    fn assume_yes_overrides_default() {
        let prompt = PromptEngine::assume_yes();
        assert!(prompt.yes_no("Proceed?", false));
    }
}
