//! Module result encoding.
//!
//! # Responsibilities
//! - Encode success as `{changed, route_table_id}`
//! - Encode failure as `{failed: true, changed: false, msg}`
//! - Map the result to a process exit status

use std::process::ExitCode;

use serde::Serialize;

use crate::reconcile::ReconcileOutcome;

/// Body of a failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub failed: bool,
    pub changed: bool,
    pub msg: String,
}

/// What the module prints on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleResponse {
    Success(ReconcileOutcome),
    Failure(Failure),
}

impl ModuleResponse {
    pub fn failure(msg: impl Into<String>) -> Self {
        ModuleResponse::Failure(Failure {
            failed: true,
            changed: false,
            msg: msg.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ModuleResponse::Failure(_))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"failed": true, "msg": "unable to encode result: {}"}}"#, e))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl From<ReconcileOutcome> for ModuleResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        ModuleResponse::Success(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json() {
        let response = ModuleResponse::from(ReconcileOutcome {
            changed: true,
            route_table_id: Some("rtb-1".into()),
        });
        assert_eq!(response.to_json(), r#"{"changed":true,"route_table_id":"rtb-1"}"#);
        assert!(!response.is_failure());
    }

    #[test]
    fn test_failure_json() {
        let response = ModuleResponse::failure("Multiple IGWs found for VPC \"vpc-1\"");
        let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["failed"], true);
        assert_eq!(value["changed"], false);
        assert_eq!(value["msg"], "Multiple IGWs found for VPC \"vpc-1\"");
        assert!(response.is_failure());
    }
}
