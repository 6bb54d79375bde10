//! Command dispatch: raw frame in, reply out.
//!
//! Every request yields exactly one [`Reply`] for the originating client.
//! Failures become `status: "error"` replies; none of them affect later
//! requests.

use serde_json::Value;

use super::messages::{
    Action, ConfigListReply, ListStatus, Reply, Status, ValueReply, config_entries,
};
use crate::domain::{StartOutcome, StopOutcome, StreamController, VarValue, VariableRegistry};
use crate::error::CommandError;

/// Routes decoded requests to the registry or the stream controller.
#[derive(Debug)]
pub struct CommandDispatcher<'a> {
    registry: &'a mut VariableRegistry,
    stream: &'a mut StreamController,
}

impl<'a> CommandDispatcher<'a> {
    /// Borrows the state a single dispatch needs.
    #[must_use]
    pub fn new(registry: &'a mut VariableRegistry, stream: &'a mut StreamController) -> Self {
        Self { registry, stream }
    }

    /// Decodes `raw` and executes the request it carries.
    pub fn dispatch(&mut self, raw: &[u8]) -> Reply {
        match self.try_dispatch(raw) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(category = ?err.category(), %err, "command rejected");
                err.into()
            }
        }
    }

    fn try_dispatch(&mut self, raw: &[u8]) -> Result<Reply, CommandError> {
        let request: Value = serde_json::from_slice(raw).map_err(|e| {
            tracing::debug!(error = %e, "malformed request");
            CommandError::Decode
        })?;

        let action = request
            .get("action")
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingAction)?;

        match Action::parse(action) {
            Some(Action::Get) => self.get(&request),
            Some(Action::Set) => self.set(&request),
            Some(Action::StartStream) => Ok(self.start_stream()),
            Some(Action::StopStream) => Ok(self.stop_stream()),
            Some(Action::GetAllVarsConfig) => self.all_vars_config(),
            None => {
                tracing::debug!(action, "unknown action");
                Err(CommandError::UnknownAction)
            }
        }
    }

    /// Resolves the `variable` field to a registry slot.
    fn resolve(&self, request: &Value) -> Result<usize, CommandError> {
        let name = request
            .get("variable")
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingVariable)?;
        self.registry
            .find(name)
            .ok_or(CommandError::VariableNotFound)
    }

    fn get(&self, request: &Value) -> Result<Reply, CommandError> {
        let index = self.resolve(request)?;
        let var = self
            .registry
            .get(index)
            .ok_or(CommandError::VariableNotFound)?;
        Ok(Reply::Value(ValueReply::from(var)))
    }

    fn set(&mut self, request: &Value) -> Result<Reply, CommandError> {
        let index = self.resolve(request)?;
        let raw_value = request
            .get("value")
            .filter(|v| !v.is_null())
            .ok_or(CommandError::MissingValue)?;
        let candidate = VarValue::from_json(raw_value).ok_or(CommandError::InvalidValue)?;
        let var = self.registry.set(index, candidate).map_err(|e| {
            tracing::info!(error = %e, "set rejected");
            CommandError::from(e)
        })?;
        Ok(Reply::Value(ValueReply::from(var)))
    }

    fn start_stream(&mut self) -> Reply {
        match self.stream.request_start() {
            StartOutcome::Started => Reply::status(Status::Ok, "Stream started."),
            StartOutcome::AlreadyActive => Reply::status(Status::Info, "Stream was already active."),
            StartOutcome::Unsupported => CommandError::Unsupported.into(),
        }
    }

    fn stop_stream(&mut self) -> Reply {
        match self.stream.request_stop() {
            StopOutcome::Stopped => Reply::status(Status::Ok, "Stream stopped."),
            StopOutcome::AlreadyInactive => {
                Reply::status(Status::Info, "Stream was already stopped.")
            }
            StopOutcome::Unsupported => CommandError::Unsupported.into(),
        }
    }

    fn all_vars_config(&self) -> Result<Reply, CommandError> {
        if self.registry.is_empty() {
            return Err(CommandError::NoVariables);
        }
        Ok(Reply::ConfigList(ConfigListReply {
            status: ListStatus::VarConfigList,
            variables: config_entries(&*self.registry),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Variable, VariableRegistry};

    struct Fixture {
        registry: VariableRegistry,
        stream: StreamController,
    }

    impl Fixture {
        fn with_vars(vars: Vec<Variable>) -> Self {
            let Ok(registry) = VariableRegistry::new(vars) else {
                panic!("valid registry");
            };
            Self {
                registry,
                stream: StreamController::new(),
            }
        }

        fn new() -> Self {
            let Ok(gain) = Variable::float("gain", 1.0).with_limits(0.0, 10.0) else {
                panic!("valid gain");
            };
            let Ok(threshold) = Variable::int("threshold", 3500).with_limits(0.0, 4095.0) else {
                panic!("valid threshold");
            };
            Self::with_vars(vec![gain, threshold, Variable::text("label", "photogate")])
        }

        fn send(&mut self, raw: &str) -> serde_json::Value {
            let reply = CommandDispatcher::new(&mut self.registry, &mut self.stream)
                .dispatch(raw.as_bytes());
            serde_json::to_value(&reply).unwrap_or_default()
        }

        fn value_of(&self, name: &str) -> Option<VarValue> {
            self.registry.by_name(name).map(|v| v.value().clone())
        }
    }

    fn error(message: &str) -> serde_json::Value {
        serde_json::json!({ "status": "error", "message": message })
    }

    #[test]
    fn malformed_json() {
        let mut fx = Fixture::new();
        assert_eq!(fx.send("{not json"), error("Invalid JSON format received."));
    }

    #[test]
    fn missing_action() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"variable":"gain"}"#),
            error("JSON missing 'action' field.")
        );
        assert_eq!(fx.send(r#"{"action":7}"#), error("JSON missing 'action' field."));
        assert_eq!(fx.send("[1,2]"), error("JSON missing 'action' field."));
    }

    #[test]
    fn unknown_action() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"reboot"}"#),
            error("Unknown 'action' command.")
        );
    }

    #[test]
    fn get_existing() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"get","variable":"threshold"}"#),
            serde_json::json!({ "variable": "threshold", "value": 3500 })
        );
    }

    #[test]
    fn get_missing_variable_name() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"get","variable":"missing"}"#),
            error("Variable name not found.")
        );
    }

    #[test]
    fn get_without_variable_field() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"get"}"#),
            error("Missing 'variable' field for get/set action.")
        );
    }

    #[test]
    fn set_unknown_name_reported_before_value() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"missing"}"#),
            error("Variable name not found.")
        );
    }

    #[test]
    fn set_null_value() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"gain","value":null}"#),
            error("Missing or null 'value' field for set action.")
        );
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"gain"}"#),
            error("Missing or null 'value' field for set action.")
        );
    }

    #[test]
    fn gain_scenario() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"gain","value":15.0}"#),
            error("Failed to set value (invalid type or out of limits).")
        );
        assert_eq!(fx.value_of("gain"), Some(VarValue::Float(1.0)));

        assert_eq!(
            fx.send(r#"{"action":"set","variable":"gain","value":2.5}"#),
            serde_json::json!({ "variable": "gain", "value": 2.5 })
        );
        assert_eq!(fx.value_of("gain"), Some(VarValue::Float(2.5)));
    }

    #[test]
    fn set_wrong_type_rejected() {
        let mut fx = Fixture::new();
        let expected = error("Failed to set value (invalid type or out of limits).");
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"label","value":3}"#),
            expected
        );
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"threshold","value":"high"}"#),
            expected
        );
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"threshold","value":true}"#),
            expected
        );
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"threshold","value":1.5}"#),
            expected
        );
    }

    #[test]
    fn set_integer_from_whole_float() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(r#"{"action":"set","variable":"threshold","value":100.0}"#),
            serde_json::json!({ "variable": "threshold", "value": 100 })
        );
    }

    #[test]
    fn set_then_get_reads_back() {
        let mut fx = Fixture::new();
        fx.send(r#"{"action":"set","variable":"label","value":"gate-2"}"#);
        assert_eq!(
            fx.send(r#"{"action":"get","variable":"label"}"#),
            serde_json::json!({ "variable": "label", "value": "gate-2" })
        );
    }

    #[test]
    fn stream_actions_without_producer() {
        let mut fx = Fixture::new();
        let expected = error("Streaming feature not implemented/configured.");
        assert_eq!(fx.send(r#"{"action":"start_stream"}"#), expected);
        assert_eq!(fx.send(r#"{"action":"stop_stream"}"#), expected);
    }

    #[test]
    fn stream_actions_with_producer() {
        let mut fx = Fixture::new();
        fx.stream
            .register_callbacks(Some(Box::new(|| {})), Some(Box::new(|| {})));

        let status = |msg: &str, status: &str| serde_json::json!({ "status": status, "message": msg });
        assert_eq!(
            fx.send(r#"{"action":"stop_stream"}"#),
            status("Stream was already stopped.", "info")
        );
        assert_eq!(
            fx.send(r#"{"action":"start_stream"}"#),
            status("Stream started.", "ok")
        );
        assert_eq!(
            fx.send(r#"{"action":"start_stream"}"#),
            status("Stream was already active.", "info")
        );
        assert_eq!(
            fx.send(r#"{"action":"stop_stream"}"#),
            status("Stream stopped.", "ok")
        );
    }

    #[test]
    fn all_vars_config_two_variables() {
        let Ok(gain) = Variable::float("gain", 1.0).with_limits(0.0, 10.0) else {
            panic!("valid gain");
        };
        let mut fx = Fixture::with_vars(vec![gain, Variable::text("mode", "auto")]);
        let reply = fx.send(r#"{"action":"get_all_vars_config"}"#);
        let variables = reply
            .get("variables")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();
        assert_eq!(variables.len(), 2);
        assert_eq!(
            reply,
            serde_json::json!({
                "status": "var_config_list",
                "variables": [
                    {
                        "name": "gain",
                        "type": "FLOAT",
                        "value": 1.0,
                        "hasLimits": true,
                        "min": 0.0,
                        "max": 10.0
                    },
                    {
                        "name": "mode",
                        "type": "STRING",
                        "value": "auto",
                        "hasLimits": false
                    }
                ]
            })
        );
    }

    #[test]
    fn all_vars_config_lists_in_order() {
        let mut fx = Fixture::new();
        let reply = fx.send(r#"{"action":"get_all_vars_config"}"#);
        assert_eq!(
            reply.get("status"),
            Some(&serde_json::json!("var_config_list"))
        );
        let Some(vars) = reply.get("variables").and_then(|v| v.as_array()) else {
            panic!("expected variables array");
        };
        let names: Vec<&str> = vars
            .iter()
            .filter_map(|v| v.get("name").and_then(|n| n.as_str()))
            .collect();
        assert_eq!(names, ["gain", "threshold", "label"]);
        let Some(label) = vars.last() else {
            panic!("expected entries");
        };
        assert_eq!(
            label,
            &serde_json::json!({
                "name": "label",
                "type": "STRING",
                "value": "photogate",
                "hasLimits": false,
            })
        );
    }
}
