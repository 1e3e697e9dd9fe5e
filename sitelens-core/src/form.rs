// URL submission form

pub const EMPTY_URL_MESSAGE: &str = "Please input URL text.";
pub const INVALID_URL_MESSAGE: &str = "Please input a valid URL text.";

const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Check that `value` is non-blank and starts with an accepted scheme.
pub fn validate_url(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(EMPTY_URL_MESSAGE);
    }
    if !ACCEPTED_SCHEMES.iter().any(|scheme| value.starts_with(scheme)) {
        return Err(INVALID_URL_MESSAGE);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    input: String,
    validation_message: Option<String>,
    is_success: Option<bool>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editing the field clears any previous validation message.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.validation_message = None;
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.validation_message = None;
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.validation_message = None;
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    pub fn is_success(&self) -> Option<bool> {
        self.is_success
    }

    /// Validate the current input, recording the message on failure.
    pub fn validate(&mut self) -> bool {
        match validate_url(&self.input) {
            Ok(()) => {
                self.validation_message = None;
                true
            }
            Err(message) => {
                self.validation_message = Some(message.to_string());
                false
            }
        }
    }

    pub(crate) fn mark_succeeded(&mut self) {
        self.input.clear();
        self.is_success = Some(true);
    }

    pub(crate) fn mark_failed(&mut self) {
        self.is_success = Some(false);
    }

    pub fn reset(&mut self) {
        self.is_success = None;
    }
}
