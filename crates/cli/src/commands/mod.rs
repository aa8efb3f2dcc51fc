pub mod config;
pub mod doctor;
pub mod seed;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// Failure classes the operator scripts branch on. Each maps to a fixed exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    ConfigValidation,
    SeedLoad,
}

impl FailureClass {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::ConfigValidation => 2,
            Self::SeedLoad => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T> {
    command: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<FailureClass>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl CommandResult {
    /// Plain text output with exit code 0.
    pub fn text(output: String) -> Self {
        Self { exit_code: 0, output }
    }

    pub fn success<T: Serialize>(command: &str, message: impl Into<String>, data: T) -> Self {
        let envelope = Envelope {
            command,
            status: Status::Ok,
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: render(command, &envelope) }
    }

    pub fn failure(command: &str, class: FailureClass, message: impl Into<String>) -> Self {
        let envelope = Envelope::<()> {
            command,
            status: Status::Error,
            error_class: Some(class),
            message: message.into(),
            data: None,
        };
        Self { exit_code: class.exit_code(), output: render(command, &envelope) }
    }
}

fn render<T: Serialize>(command: &str, envelope: &Envelope<'_, T>) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|error| {
        serde_json::json!({
            "command": command,
            "status": "error",
            "error_class": "serialization",
            "message": error.to_string(),
        })
        .to_string()
    })
}
