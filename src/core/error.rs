use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigMissingKey,
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    ProjectNotFound,
    EnvironmentNotFound,
    PlaybookNotFound,
    ScriptNotFound,

    AliasUnresolved,
    SshIdentityFileNotFound,

    RemoteCommandFailed,
    PlaybookRunFailed,

    Cancelled,
    NotImplemented,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ProjectNotFound => "project.not_found",
            ErrorCode::EnvironmentNotFound => "environment.not_found",
            ErrorCode::PlaybookNotFound => "playbook.not_found",
            ErrorCode::ScriptNotFound => "script.not_found",

            ErrorCode::AliasUnresolved => "alias.unresolved",
            ErrorCode::SshIdentityFileNotFound => "ssh.identity_file_not_found",

            ErrorCode::RemoteCommandFailed => "remote.command_failed",
            ErrorCode::PlaybookRunFailed => "playbook.run_failed",

            ErrorCode::Cancelled => "operation.cancelled",
            ErrorCode::NotImplemented => "operation.not_implemented",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentNotFoundDetails {
    pub project: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookNotFoundDetails {
    pub playbook: String,
    pub project: String,
    pub environment: String,
    pub available: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptNotFoundDetails {
    pub name: String,
    pub tried: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasUnresolvedDetails {
    pub alias: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SshIdentityFileNotFoundDetails {
    pub alias: String,
    pub identity_file: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
    pub alias: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookRunFailedDetails {
    pub playbook: String,
    pub exit_code: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn project_not_found(name: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            "Project not found",
            to_details(NotFoundDetails { id: name.into() }),
        )
        .with_hint("Run 'caretaker project list' to see configured projects")
    }

    pub fn environment_not_found(
        project: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        let project = project.into();
        let environment = environment.into();
        Self::new(
            ErrorCode::EnvironmentNotFound,
            format!("Environment '{}' not found for project '{}'", environment, project),
            to_details(EnvironmentNotFoundDetails {
                project,
                environment,
            }),
        )
        .with_hint("Run 'caretaker project list' to see environments per project")
    }

    pub fn playbook_not_found(
        playbook: impl Into<String>,
        project: impl Into<String>,
        environment: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        let playbook = playbook.into();
        Self::new(
            ErrorCode::PlaybookNotFound,
            format!("Playbook '{}' is not configured for this environment", playbook),
            to_details(PlaybookNotFoundDetails {
                playbook,
                project: project.into(),
                environment: environment.into(),
                available,
            }),
        )
    }

    pub fn script_not_found(name: impl Into<String>, tried: Vec<String>) -> Self {
        let name = name.into();
        Self::new(
            ErrorCode::ScriptNotFound,
            format!("Script '{}' not found", name),
            to_details(ScriptNotFoundDetails { name, tried }),
        )
    }

    pub fn alias_unresolved(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self::new(
            ErrorCode::AliasUnresolved,
            format!("Site alias '{}' could not be resolved", alias),
            to_details(AliasUnresolvedDetails { alias }),
        )
        .with_hint("Run 'caretaker alias list' to see configured site aliases")
    }

    pub fn ssh_identity_file_not_found(
        alias: impl Into<String>,
        identity_file: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::SshIdentityFileNotFound,
            "SSH identity file not found",
            to_details(SshIdentityFileNotFoundDetails {
                alias: alias.into(),
                identity_file: identity_file.into(),
            }),
        )
    }

    pub fn remote_command_failed(details: RemoteCommandFailedDetails) -> Self {
        let command = details.command.clone();
        Self::new(
            ErrorCode::RemoteCommandFailed,
            format!("Remote command failed: {}", command),
            to_details(details),
        )
    }

    pub fn playbook_run_failed(playbook: impl Into<String>, exit_code: i32) -> Self {
        let playbook = playbook.into();
        Self::new(
            ErrorCode::PlaybookRunFailed,
            format!("Playbook run failed: {}", playbook),
            to_details(PlaybookRunFailedDetails {
                playbook,
                exit_code,
            }),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(
            ErrorCode::Cancelled,
            "Cancelled",
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            format!("Command not implemented: {}", operation.into()),
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn config_missing_key(key: impl Into<String>, context: Option<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::ConfigMissingKey,
            format!("Missing required configuration key: {}", key),
            to_details(ConfigMissingKeyDetails { key, context }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem: problem.into(),
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
