//! Wire messages: inbound actions and the three outbound reply shapes.
//!
//! Inbound:
//!
//! ```json
//! { "action": "set", "variable": "gain", "value": 2.5 }
//! ```
//!
//! Outbound:
//!
//! ```json
//! { "variable": "gain", "value": 2.5 }
//! { "status": "error", "message": "Variable name not found." }
//! { "status": "var_config_list", "variables": [ ... ] }
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{VarKind, VarValue, Variable, VariableRegistry};
use crate::error::CommandError;

/// Actions a client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read one variable.
    Get,
    /// Write one variable.
    Set,
    /// Start the producer.
    StartStream,
    /// Stop the producer.
    StopStream,
    /// List every variable with its configuration.
    GetAllVarsConfig,
}

impl Action {
    /// Parses the wire name of an action.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "start_stream" => Some(Self::StartStream),
            "stop_stream" => Some(Self::StopStream),
            "get_all_vars_config" => Some(Self::GetAllVarsConfig),
            _ => None,
        }
    }
}

/// Status discriminator of a [`StatusReply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The request took effect.
    Ok,
    /// The request failed.
    Error,
    /// The request was a no-op.
    Info,
}

/// `{ "variable", "value" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueReply {
    /// Variable name.
    pub variable: String,
    /// Current value.
    pub value: VarValue,
}

impl From<&Variable> for ValueReply {
    fn from(var: &Variable) -> Self {
        Self {
            variable: var.name().to_string(),
            value: var.value().clone(),
        }
    }
}

/// `{ "status", "message" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReply {
    /// Outcome class.
    pub status: Status,
    /// Human-readable message.
    pub message: String,
}

/// Fixed status tag of a [`ConfigListReply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    /// Serializes as `"var_config_list"`.
    VarConfigList,
}

/// One variable in a configuration listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VarConfigEntry {
    /// Variable name.
    pub name: String,
    /// Kind as `"INT"`, `"FLOAT"` or `"STRING"`.
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "FLOAT")]
    pub kind: VarKind,
    /// Current value.
    #[schema(value_type = Object)]
    pub value: VarValue,
    /// Whether `min`/`max` are present.
    #[serde(rename = "hasLimits")]
    pub has_limits: bool,
    /// Lower bound, when limited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound, when limited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl From<&Variable> for VarConfigEntry {
    fn from(var: &Variable) -> Self {
        let limits = var.limits();
        Self {
            name: var.name().to_string(),
            kind: var.kind(),
            value: var.value().clone(),
            has_limits: limits.is_some(),
            min: limits.map(|l| l.min),
            max: limits.map(|l| l.max),
        }
    }
}

/// Builds the configuration listing of `registry` in registration order.
#[must_use]
pub fn config_entries(registry: &VariableRegistry) -> Vec<VarConfigEntry> {
    registry.iter().map(VarConfigEntry::from).collect()
}

/// `{ "status": "var_config_list", "variables": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigListReply {
    /// Always [`ListStatus::VarConfigList`].
    pub status: ListStatus,
    /// One entry per variable.
    pub variables: Vec<VarConfigEntry>,
}

/// Any reply the dispatcher produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Value of one variable.
    Value(ValueReply),
    /// Outcome of a command.
    Status(StatusReply),
    /// Full registry listing.
    ConfigList(ConfigListReply),
}

impl Reply {
    /// Builds a status reply.
    #[must_use]
    pub fn status(status: Status, message: impl Into<String>) -> Self {
        Self::Status(StatusReply {
            status,
            message: message.into(),
        })
    }

    /// Returns the status discriminator if this is a status reply.
    #[must_use]
    pub fn status_kind(&self) -> Option<Status> {
        match self {
            Self::Status(reply) => Some(reply.status),
            _ => None,
        }
    }

    /// Serializes the reply to a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Self::status(Status::Error, err.to_string())
    }
}
