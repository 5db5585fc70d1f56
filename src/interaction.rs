//! Confirmation, prompt and alert hooks used by page controllers

use log::info;

/// Fallback text when a failed call carries no server message
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The user-facing side of a mutating action
///
/// Controllers ask before destructive or state-changing calls and report
/// failures through `alert`. Front ends implement this against their own
/// dialogs; tests script it.
pub trait Interaction: Send + Sync {
    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> bool;

    /// Ask for free text; `None` means the prompt was cancelled
    fn prompt(&self, message: &str) -> Option<String>;

    /// Show a blocking notice
    fn alert(&self, message: &str);
}

/// Answers yes to every question and logs alerts
///
/// Prompts are answered with the configured text, so a reject issued
/// non-interactively still carries a reason.
#[derive(Debug, Clone, Default)]
pub struct AssumeYes {
    answer: String,
}

impl AssumeYes {
    /// Create an instance answering prompts with `answer`
    pub fn with_answer(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
        }
    }
}

impl Interaction for AssumeYes {
    fn confirm(&self, message: &str) -> bool {
        info!("Confirmed: {}", message);
        true
    }

    fn prompt(&self, message: &str) -> Option<String> {
        info!("Prompt '{}' answered with '{}'", message, self.answer);
        Some(self.answer.clone())
    }

    fn alert(&self, message: &str) {
        info!("{}", message);
    }
}
