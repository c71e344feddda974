use std::fmt::Display;

const CONFIRM_PROMPT: &str = "Type \"yes\" to confirm or \"no\" to cancel.";

/// Builder for the text a human approves.
///
/// Output order: warnings, the question, one `Label: value` line per field,
/// notes, then the yes/no prompt. Optional fields that are absent produce no
/// line, so equal parameters always render equal summaries.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    warnings: Vec<String>,
    question: String,
    fields: Vec<String>,
    notes: Vec<String>,
}

impl Summary {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Prepend a `WARNING:` line. Used by irreversible actions.
    pub fn warning(mut self, text: impl Display) -> Self {
        self.warnings.push(format!("WARNING: {text}"));
        self
    }

    pub fn field(mut self, label: &str, value: impl Display) -> Self {
        self.fields.push(format!("{label}: {value}"));
        self
    }

    pub fn optional<T: Display>(self, label: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self,
        }
    }

    pub fn flag(self, label: &str, value: Option<bool>) -> Self {
        self.optional(label, value.map(|enabled| if enabled { "yes" } else { "no" }))
    }

    pub fn list<T: Display>(self, label: &str, values: &[T]) -> Self {
        let joined = if values.is_empty() {
            "(none)".to_string()
        } else {
            values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        };
        self.field(label, joined)
    }

    /// Show that a secret is set without echoing it.
    pub fn secret(self, label: &str, value: Option<&str>) -> Self {
        match value {
            Some(secret) if !secret.is_empty() => self.field(label, format!("set ({} characters, hidden)", secret.chars().count())),
            _ => self,
        }
    }

    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.notes.push(text.into());
        self
    }

    pub fn finish(self) -> String {
        let mut lines = Vec::with_capacity(self.warnings.len() + self.fields.len() + self.notes.len() + 4);
        if !self.warnings.is_empty() {
            lines.extend(self.warnings);
            lines.push(String::new());
        }
        lines.push(self.question);
        lines.extend(self.fields);
        lines.push(String::new());
        lines.extend(self.notes);
        lines.push(CONFIRM_PROMPT.to_string());
        lines.join("\n")
    }
}
