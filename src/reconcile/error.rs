//! Reconciliation error types.

use std::fmt;

use thiserror::Error;

use crate::cloud::CloudError;
use crate::config::validation::ValidationError;

/// A lookup that matched zero or several resources where exactly one was required.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Subnet ID \"{0}\" does not exist")]
    SubnetIdNotFound(String),

    #[error("Subnet CIDR \"{0}\" does not exist")]
    SubnetCidrNotFound(String),

    #[error("Multiple subnets with CIDR \"{0}\"")]
    MultipleSubnetCidrs(String),

    #[error("Subnet named \"{0}\" does not exist")]
    SubnetNameNotFound(String),

    #[error("Multiple subnets named \"{0}\"")]
    MultipleSubnetNames(String),

    #[error("No IGW found for VPC \"{0}\"")]
    NoInternetGateway(String),

    #[error("Multiple IGWs found for VPC \"{0}\"")]
    MultipleInternetGateways(String),

    /// The tag selector matched more than one route table.
    #[error("Tags {tags} match multiple route tables: {}", .candidates.join(", "))]
    AmbiguousRouteTable { tags: String, candidates: Vec<String> },
}

/// The reconciliation step a provider failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FindInternetGateway,
    FindRouteTable,
    CreateRouteTable,
    DeleteRouteTable,
    EnablePropagation,
    UpdateTags,
    EnsureRoutes,
    FindSubnets,
    AssociateSubnets,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::FindInternetGateway => "find internet gateway for",
            Step::FindRouteTable => "find route table",
            Step::CreateRouteTable => "create route table",
            Step::DeleteRouteTable => "delete route table",
            Step::EnablePropagation => "enable route propagation for route table",
            Step::UpdateTags => "update tags for",
            Step::EnsureRoutes => "ensure routes for route table",
            Step::FindSubnets => "find subnets for route table",
            Step::AssociateSubnets => "associate subnets for route table",
        };
        f.write_str(text)
    }
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A provider call failed; `resource` names what was being reconciled.
    #[error("Unable to {step} {resource}, error: {source}")]
    Remote {
        step: Step,
        resource: String,
        #[source]
        source: CloudError,
    },
}

impl ReconcileError {
    pub fn remote(step: Step, resource: impl Into<String>, source: CloudError) -> Self {
        Self::Remote {
            step,
            resource: resource.into(),
            source,
        }
    }

    /// The failing step, for provider errors.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Remote { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Attach step context to provider results.
pub(crate) trait StepContext<T> {
    fn step(self, step: Step, resource: &str) -> ReconcileResult<T>;
}

impl<T> StepContext<T> for Result<T, CloudError> {
    fn step(self, step: Step, resource: &str) -> ReconcileResult<T> {
        self.map_err(|e| ReconcileError::remote(step, resource, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReconcileError::remote(
            Step::EnsureRoutes,
            "rtb-1",
            CloudError::new("RouteAlreadyExists", "exists"),
        );
        assert_eq!(
            err.to_string(),
            "Unable to ensure routes for route table rtb-1, error: RouteAlreadyExists: exists"
        );
        assert_eq!(err.step(), Some(Step::EnsureRoutes));

        let err = ReconcileError::from(LookupError::AmbiguousRouteTable {
            tags: "{Name=Public}".into(),
            candidates: vec!["rtb-1".into(), "rtb-2".into()],
        });
        assert_eq!(
            err.to_string(),
            "Tags {Name=Public} match multiple route tables: rtb-1, rtb-2"
        );
        assert_eq!(err.step(), None);
    }

    #[test]
    fn test_lookup_messages() {
        assert_eq!(
            LookupError::MultipleSubnetNames("db".into()).to_string(),
            "Multiple subnets named \"db\""
        );
        assert_eq!(
            LookupError::NoInternetGateway("vpc-1".into()).to_string(),
            "No IGW found for VPC \"vpc-1\""
        );
    }
}
