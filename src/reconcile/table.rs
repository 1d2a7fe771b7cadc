//! Route table lifecycle: ensure present / ensure absent.
//!
//! # Responsibilities
//! - Locate the table by ID or by tag subset match
//! - Create or delete it
//! - Drive propagation, tags, routes and associations in that order
//!
//! # Design Decisions
//! - No rollback: a failed step leaves earlier steps applied, and an
//!   idempotent re-run picks up where it stopped
//! - Check mode never creates; a missing table reports a change with no ID

use serde::Serialize;

use crate::cloud::{RouteSpec, RouteTable, RouteTableFilter, TagSet, VpcClient};
use crate::config::validation::ValidationError;
use crate::reconcile::associations::ensure_subnet_associations;
use crate::reconcile::error::{LookupError, ReconcileResult, Step, StepContext};
use crate::reconcile::propagation::ensure_propagation;
use crate::reconcile::routes::{ensure_routes, resolve_internet_gateway};
use crate::reconcile::subnets::find_subnets;
use crate::reconcile::tags::ensure_tags;

/// Desired state of one route table.
///
/// `None` fields are left untouched on the existing table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTableRequest {
    pub vpc_id: String,
    pub route_table_id: Option<String>,
    /// Selector when `route_table_id` is absent, and the desired tags.
    pub resource_tags: Option<TagSet>,
    pub routes: Option<Vec<RouteSpec>>,
    pub subnets: Option<Vec<String>>,
    pub propagating_vgw_ids: Option<Vec<String>>,
}

/// How the table is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Id(&'a str),
    Tags(&'a TagSet),
}

impl RouteTableRequest {
    /// `route_table_id` wins over `resource_tags`; one of them is required.
    pub fn selector(&self) -> Result<Selector<'_>, ValidationError> {
        if let Some(id) = self.route_table_id.as_deref().filter(|id| !id.is_empty()) {
            return Ok(Selector::Id(id));
        }
        match &self.resource_tags {
            Some(tags) if !tags.is_empty() => Ok(Selector::Tags(tags)),
            _ => Err(ValidationError::MissingSelector),
        }
    }
}

/// Result reported back to the orchestration engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub changed: bool,
    /// Absent when check mode would have created the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table_id: Option<String>,
}

impl ReconcileOutcome {
    fn new(changed: bool, route_table_id: Option<String>) -> Self {
        Self {
            changed,
            route_table_id,
        }
    }
}

/// True when every selector tag is present on the candidate with the same value.
pub fn tags_match(selector: &TagSet, candidate: &TagSet) -> bool {
    selector
        .iter()
        .all(|(k, v)| candidate.get(k) == Some(v))
}

fn format_tags(tags: &TagSet) -> String {
    let pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Find the route table `selector` names in `vpc_id`.
pub async fn find_route_table<C: VpcClient>(
    client: &C,
    vpc_id: &str,
    selector: Selector<'_>,
) -> ReconcileResult<Option<RouteTable>> {
    match selector {
        Selector::Id(id) => {
            let tables = client
                .describe_route_tables(vpc_id, &RouteTableFilter::by_id(id))
                .await
                .step(Step::FindRouteTable, id)?;
            Ok(tables.into_iter().next())
        }
        Selector::Tags(tags) => {
            let resource = format_tags(tags);
            let tables = client
                .describe_route_tables(vpc_id, &RouteTableFilter::default())
                .await
                .step(Step::FindRouteTable, &resource)?;

            let mut matching = Vec::new();
            for table in tables {
                let table_tags = client
                    .describe_tags(&table.id)
                    .await
                    .step(Step::FindRouteTable, &resource)?;
                if tags_match(tags, &table_tags) {
                    matching.push(table);
                }
            }

            if matching.len() > 1 {
                return Err(LookupError::AmbiguousRouteTable {
                    tags: resource,
                    candidates: matching.into_iter().map(|t| t.id).collect(),
                }
                .into());
            }
            Ok(matching.into_iter().next())
        }
    }
}

/// Delete the selected route table if it exists.
pub async fn ensure_route_table_absent<C: VpcClient>(
    client: &C,
    request: &RouteTableRequest,
    check_mode: bool,
) -> ReconcileResult<ReconcileOutcome> {
    let selector = request.selector()?;
    let Some(table) = find_route_table(client, &request.vpc_id, selector).await? else {
        tracing::info!(vpc_id = %request.vpc_id, selector = ?selector, "Route table already absent");
        return Ok(ReconcileOutcome::new(false, None));
    };

    tracing::info!(route_table_id = %table.id, check_mode, "Deleting route table");
    client
        .delete_route_table(&table.id, check_mode)
        .await
        .step(Step::DeleteRouteTable, &table.id)?;

    Ok(ReconcileOutcome::new(true, Some(table.id)))
}

/// Create or update the selected route table to match `request`.
pub async fn ensure_route_table_present<C: VpcClient>(
    client: &C,
    request: &RouteTableRequest,
    check_mode: bool,
) -> ReconcileResult<ReconcileOutcome> {
    let vpc_id = request.vpc_id.as_str();
    let selector = request.selector()?;

    let routes = match &request.routes {
        Some(routes) => Some(resolve_internet_gateway(client, vpc_id, routes.clone()).await?),
        None => None,
    };

    let found = find_route_table(client, vpc_id, selector).await?;
    let (table, created) = match found {
        Some(table) => (table, false),
        None if check_mode => {
            tracing::info!(vpc_id, selector = ?selector, "Route table would be created");
            return Ok(ReconcileOutcome::new(true, None));
        }
        None => {
            let resource = match selector {
                Selector::Id(id) => id.to_string(),
                Selector::Tags(tags) => format_tags(tags),
            };
            let table = client
                .create_route_table(vpc_id)
                .await
                .step(Step::CreateRouteTable, &resource)?;
            tracing::info!(vpc_id, route_table_id = %table.id, "Created route table");
            (table, true)
        }
    };

    let mut changed = created;

    if let Some(vgw_ids) = &request.propagating_vgw_ids {
        changed |= ensure_propagation(client, &table, vgw_ids, check_mode).await?;
    }

    if let Some(tags) = &request.resource_tags {
        let add_only = !(matches!(selector, Selector::Id(_)) && !created);
        changed |= ensure_tags(client, &table.id, tags, add_only, check_mode).await?;
    }

    if let Some(routes) = &routes {
        let vgw_ids = request.propagating_vgw_ids.as_deref().unwrap_or_default();
        changed |= ensure_routes(client, &table, routes, vgw_ids, check_mode).await?;
    }

    if let Some(subnets) = request.subnets.as_deref().filter(|s| !s.is_empty()) {
        let resolved = find_subnets(client, vpc_id, &table.id, subnets).await?;
        changed |= ensure_subnet_associations(client, vpc_id, &table, &resolved, check_mode).await?;
    }

    tracing::info!(route_table_id = %table.id, changed, check_mode, "Route table reconciled");

    Ok(ReconcileOutcome::new(changed, Some(table.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::MemoryVpc;
    use crate::reconcile::error::ReconcileError;

    fn tags(pairs: &[(&str, &str)]) -> TagSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_selector() {
        let mut request = RouteTableRequest {
            vpc_id: "vpc-1".into(),
            resource_tags: Some(tags(&[("Name", "Public")])),
            ..RouteTableRequest::default()
        };
        assert!(matches!(request.selector(), Ok(Selector::Tags(_))));

        request.route_table_id = Some("rtb-1".into());
        assert_eq!(request.selector(), Ok(Selector::Id("rtb-1")));

        let empty = RouteTableRequest {
            vpc_id: "vpc-1".into(),
            resource_tags: Some(TagSet::new()),
            ..RouteTableRequest::default()
        };
        assert_eq!(empty.selector(), Err(ValidationError::MissingSelector));
    }

    #[test]
    fn test_tags_match_is_subset() {
        let candidate = tags(&[("Name", "Public"), ("env", "prod")]);
        assert!(tags_match(&tags(&[("Name", "Public")]), &candidate));
        assert!(!tags_match(&tags(&[("Name", "Private")]), &candidate));
        assert!(!tags_match(&tags(&[("team", "net")]), &candidate));
    }

    #[tokio::test]
    async fn test_missing_selector_is_validation_error() {
        let vpc = MemoryVpc::new();
        let request = RouteTableRequest {
            vpc_id: "vpc-1".into(),
            ..RouteTableRequest::default()
        };
        let err = ensure_route_table_absent(&vpc, &request, false).await.unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Validation(ValidationError::MissingSelector)
        ));
        assert_eq!(err.to_string(), "must provide route_table_id or resource_tags");
        assert!(vpc.calls().is_empty());
    }

    #[tokio::test]
    async fn test_created_table_gets_tags() {
        let vpc = MemoryVpc::new().with_vpc("vpc-1", "10.0.0.0/16");
        let request = RouteTableRequest {
            vpc_id: "vpc-1".into(),
            resource_tags: Some(tags(&[("Name", "Public")])),
            ..RouteTableRequest::default()
        };
        let outcome = ensure_route_table_present(&vpc, &request, false).await.unwrap();
        assert!(outcome.changed);
        let id = outcome.route_table_id.unwrap();
        assert_eq!(vpc.tags_of(&id), tags(&[("Name", "Public")]));

        let again = ensure_route_table_present(&vpc, &request, false).await.unwrap();
        assert_eq!(again, ReconcileOutcome::new(false, Some(id)));
    }

    #[tokio::test]
    async fn test_check_mode_does_not_create() {
        let vpc = MemoryVpc::new().with_vpc("vpc-1", "10.0.0.0/16");
        let request = RouteTableRequest {
            vpc_id: "vpc-1".into(),
            resource_tags: Some(tags(&[("Name", "Public")])),
            ..RouteTableRequest::default()
        };
        let outcome = ensure_route_table_present(&vpc, &request, true).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::new(true, None));
        assert!(vpc.snapshot().route_tables.is_empty());
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"changed":true}"#);
    }
}
