//! In-process VPC provider with file persistence.
//!
//! # Responsibilities
//! - Implement `VpcClient` with the provider's observable semantics
//!   (VPC scoping, error codes, exclusive subnet associations)
//! - Validate dry-run calls without mutating anything
//! - Persist the whole VPC state to a JSON file between invocations
//! - Inject per-operation faults and record calls for tests

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cloud::client::VpcClient;
use crate::cloud::types::{
    Association, CloudError, CloudResult, InternetGateway, Route, RouteOrigin, RouteSpec,
    RouteTable, RouteTableFilter, RouteTarget, Subnet, SubnetFilter, TagSet,
};

/// Client operations, used for fault injection and the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DescribeRouteTables,
    CreateRouteTable,
    DeleteRouteTable,
    CreateRoute,
    DeleteRoute,
    EnableVgwRoutePropagation,
    DescribeSubnets,
    AssociateRouteTable,
    DisassociateRouteTable,
    DescribeTags,
    CreateTags,
    DeleteTags,
    DescribeInternetGateways,
}

impl Operation {
    /// True for calls that change provider state.
    pub fn is_mutation(self) -> bool {
        !matches!(
            self,
            Operation::DescribeRouteTables
                | Operation::DescribeSubnets
                | Operation::DescribeTags
                | Operation::DescribeInternetGateways
        )
    }
}

/// Everything the provider knows, as persisted on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcState {
    /// VPC ID -> VPC CIDR block (the local route destination).
    pub vpcs: BTreeMap<String, String>,
    pub subnets: Vec<Subnet>,
    pub internet_gateways: Vec<InternetGateway>,
    pub route_tables: Vec<RouteTable>,
    /// Route table ID -> gateways with propagation enabled.
    pub propagating_gateways: BTreeMap<String, BTreeSet<String>>,
    /// Virtual private gateway ID -> prefixes it advertises.
    pub vgw_prefixes: BTreeMap<String, Vec<String>>,
    /// Resource ID -> tags.
    pub tags: BTreeMap<String, TagSet>,
    /// Last allocated resource sequence number.
    pub sequence: u64,
}

impl VpcState {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}-{:08x}", prefix, self.sequence)
    }

    fn table_mut(&mut self, route_table_id: &str) -> CloudResult<&mut RouteTable> {
        self.route_tables
            .iter_mut()
            .find(|t| t.id == route_table_id)
            .ok_or_else(|| route_table_not_found(route_table_id))
    }

    fn table(&self, route_table_id: &str) -> CloudResult<&RouteTable> {
        self.route_tables
            .iter()
            .find(|t| t.id == route_table_id)
            .ok_or_else(|| route_table_not_found(route_table_id))
    }

    fn resource_exists(&self, resource_id: &str) -> bool {
        self.route_tables.iter().any(|t| t.id == resource_id)
            || self.subnets.iter().any(|s| s.id == resource_id)
            || self.internet_gateways.iter().any(|g| g.id == resource_id)
    }
}

fn route_table_not_found(route_table_id: &str) -> CloudError {
    CloudError::new(
        "InvalidRouteTableID.NotFound",
        format!("The routeTable ID '{}' does not exist", route_table_id),
    )
}

fn resource_not_found(resource_id: &str) -> CloudError {
    CloudError::new(
        "InvalidID",
        format!("The ID '{}' is not valid", resource_id),
    )
}

/// A VPC provider held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryVpc {
    state: Mutex<VpcState>,
    faults: Mutex<HashMap<Operation, CloudError>>,
    calls: Mutex<Vec<Operation>>,
    persistence_path: Option<PathBuf>,
}

impl MemoryVpc {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider from an existing state snapshot.
    pub fn from_state(state: VpcState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Load from file if it exists; otherwise start empty. Either way the
    /// path is remembered for `save_to_file`.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let mut vpc = Self::new();
        if path.exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let state: VpcState = serde_json::from_reader(reader)?;
            tracing::debug!(
                path = %path.display(),
                route_tables = state.route_tables.len(),
                subnets = state.subnets.len(),
                "Loaded VPC state"
            );
            vpc = Self::from_state(state);
        }
        vpc.persistence_path = Some(path.to_path_buf());
        Ok(vpc)
    }

    /// Save to the file this provider was loaded from, if any.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &*self.lock_state())?;
            tracing::debug!(path = %path.display(), "Saved VPC state");
        }
        Ok(())
    }

    /// Register a VPC and its CIDR block.
    pub fn with_vpc(mut self, vpc_id: &str, cidr_block: &str) -> Self {
        self.state_mut()
            .vpcs
            .insert(vpc_id.to_string(), cidr_block.to_string());
        self
    }

    pub fn with_subnet(mut self, subnet: Subnet) -> Self {
        self.state_mut().subnets.push(subnet);
        self
    }

    /// Register an internet gateway attached to `vpc_id`.
    pub fn with_internet_gateway(mut self, gateway_id: &str, vpc_id: &str) -> Self {
        self.state_mut().internet_gateways.push(InternetGateway {
            id: gateway_id.to_string(),
            attachments: vec![vpc_id.to_string()],
        });
        self
    }

    /// Register a virtual private gateway advertising `prefixes`. Enabling
    /// propagation from it adds one propagated route per prefix.
    pub fn with_vgw(mut self, gateway_id: &str, prefixes: &[&str]) -> Self {
        self.state_mut().vgw_prefixes.insert(
            gateway_id.to_string(),
            prefixes.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_route_table(mut self, table: RouteTable) -> Self {
        self.state_mut().route_tables.push(table);
        self
    }

    pub fn with_tags(mut self, resource_id: &str, tags: TagSet) -> Self {
        self.state_mut()
            .tags
            .entry(resource_id.to_string())
            .or_default()
            .extend(tags);
        self
    }

    /// Make every subsequent `op` call fail with `error`.
    pub fn inject_failure(&self, op: Operation, error: CloudError) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op, error);
    }

    pub fn clear_failures(&self) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Every call made so far, in order. Failed calls are included.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count_calls(&self, op: Operation) -> usize {
        self.calls().into_iter().filter(|c| *c == op).count()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> VpcState {
        self.lock_state().clone()
    }

    pub fn route_table(&self, route_table_id: &str) -> Option<RouteTable> {
        self.lock_state().table(route_table_id).ok().cloned()
    }

    pub fn tags_of(&self, resource_id: &str) -> TagSet {
        self.lock_state()
            .tags
            .get(resource_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn propagating_gateways(&self, route_table_id: &str) -> Vec<String> {
        self.lock_state()
            .propagating_gateways
            .get(route_table_id)
            .map(|gws| gws.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// IDs of every table associated with `subnet_id`.
    pub fn tables_for_subnet(&self, subnet_id: &str) -> Vec<String> {
        self.lock_state()
            .route_tables
            .iter()
            .filter(|t| t.association_for(subnet_id).is_some())
            .map(|t| t.id.clone())
            .collect()
    }

    fn lock_state(&self) -> MutexGuard<'_, VpcState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut VpcState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log the call and surface any injected fault.
    fn enter(&self, op: Operation) -> CloudResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
        match self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&op)
        {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl VpcClient for MemoryVpc {
    async fn describe_route_tables(
        &self,
        vpc_id: &str,
        filter: &RouteTableFilter,
    ) -> CloudResult<Vec<RouteTable>> {
        self.enter(Operation::DescribeRouteTables)?;
        let state = self.lock_state();
        Ok(state
            .route_tables
            .iter()
            .filter(|t| t.vpc_id == vpc_id)
            .filter(|t| filter.ids.is_empty() || filter.ids.contains(&t.id))
            .filter(|t| match &filter.associated_subnet {
                Some(subnet_id) => t.association_for(subnet_id).is_some(),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn create_route_table(&self, vpc_id: &str) -> CloudResult<RouteTable> {
        self.enter(Operation::CreateRouteTable)?;
        let mut state = self.lock_state();
        let vpc_cidr = state.vpcs.get(vpc_id).cloned().ok_or_else(|| {
            CloudError::new(
                "InvalidVpcID.NotFound",
                format!("The vpc ID '{}' does not exist", vpc_id),
            )
        })?;
        let table = RouteTable {
            id: state.allocate_id("rtb"),
            vpc_id: vpc_id.to_string(),
            routes: vec![Route::local(vpc_cidr)],
            associations: Vec::new(),
        };
        state.route_tables.push(table.clone());
        Ok(table)
    }

    async fn delete_route_table(&self, route_table_id: &str, dry_run: bool) -> CloudResult<()> {
        self.enter(Operation::DeleteRouteTable)?;
        let mut state = self.lock_state();
        let table = state.table(route_table_id)?;
        if table.associations.iter().any(|a| a.main) {
            return Err(CloudError::new(
                "DependencyViolation",
                format!("The routeTable '{}' is the main route table and cannot be deleted", route_table_id),
            ));
        }
        if dry_run {
            return Ok(());
        }
        state.route_tables.retain(|t| t.id != route_table_id);
        state.propagating_gateways.remove(route_table_id);
        state.tags.remove(route_table_id);
        Ok(())
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        route: &RouteSpec,
        dry_run: bool,
    ) -> CloudResult<()> {
        self.enter(Operation::CreateRoute)?;
        let mut state = self.lock_state();
        let table = state.table_mut(route_table_id)?;
        if table
            .routes
            .iter()
            .any(|r| r.destination_cidr == route.destination_cidr)
        {
            return Err(CloudError::new(
                "RouteAlreadyExists",
                format!(
                    "The route identified by {} already exists",
                    route.destination_cidr
                ),
            ));
        }
        if !dry_run {
            table.routes.push(Route::from(route));
        }
        Ok(())
    }

    async fn delete_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
        dry_run: bool,
    ) -> CloudResult<()> {
        self.enter(Operation::DeleteRoute)?;
        let mut state = self.lock_state();
        let table = state.table_mut(route_table_id)?;
        let index = table
            .routes
            .iter()
            .position(|r| r.destination_cidr == destination_cidr)
            .ok_or_else(|| {
                CloudError::new(
                    "InvalidRoute.NotFound",
                    format!(
                        "no route with destination-cidr-block {} in route table {}",
                        destination_cidr, route_table_id
                    ),
                )
            })?;
        if table.routes[index].target.is_local() {
            return Err(CloudError::new(
                "InvalidParameterValue",
                format!("cannot remove local route {} in route table {}", destination_cidr, route_table_id),
            ));
        }
        if !dry_run {
            table.routes.remove(index);
        }
        Ok(())
    }

    async fn enable_vgw_route_propagation(
        &self,
        route_table_id: &str,
        gateway_id: &str,
        dry_run: bool,
    ) -> CloudResult<()> {
        self.enter(Operation::EnableVgwRoutePropagation)?;
        let mut state = self.lock_state();
        state.table(route_table_id)?;
        if dry_run {
            return Ok(());
        }
        state
            .propagating_gateways
            .entry(route_table_id.to_string())
            .or_default()
            .insert(gateway_id.to_string());

        let prefixes = state.vgw_prefixes.get(gateway_id).cloned().unwrap_or_default();
        let table = state.table_mut(route_table_id)?;
        for prefix in prefixes {
            if table.routes.iter().any(|r| r.destination_cidr == prefix) {
                continue;
            }
            table.routes.push(
                Route::new(prefix, RouteTarget::Gateway(gateway_id.to_string()))
                    .with_origin(RouteOrigin::EnableVgwRoutePropagation),
            );
        }
        Ok(())
    }

    async fn describe_subnets(
        &self,
        vpc_id: &str,
        filter: &SubnetFilter,
    ) -> CloudResult<Vec<Subnet>> {
        self.enter(Operation::DescribeSubnets)?;
        let state = self.lock_state();
        Ok(state
            .subnets
            .iter()
            .filter(|s| s.vpc_id == vpc_id)
            .filter(|s| match filter {
                SubnetFilter::Ids(ids) => ids.contains(&s.id),
                SubnetFilter::Cidrs(cidrs) => cidrs.contains(&s.cidr_block),
                SubnetFilter::Names(names) => s
                    .name()
                    .map(|name| names.iter().any(|n| n == name))
                    .unwrap_or(false),
            })
            .cloned()
            .collect())
    }

    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> CloudResult<String> {
        self.enter(Operation::AssociateRouteTable)?;
        let mut state = self.lock_state();
        let vpc_id = state.table(route_table_id)?.vpc_id.clone();
        if !state
            .subnets
            .iter()
            .any(|s| s.id == subnet_id && s.vpc_id == vpc_id)
        {
            return Err(CloudError::new(
                "InvalidSubnetID.NotFound",
                format!("The subnet ID '{}' does not exist", subnet_id),
            ));
        }
        if let Some(existing) = state
            .route_tables
            .iter()
            .find_map(|t| t.association_for(subnet_id))
        {
            return Err(CloudError::new(
                "Resource.AlreadyAssociated",
                format!(
                    "the specified association for route table {} conflicts with an existing association",
                    existing.route_table_id
                ),
            ));
        }
        let association_id = state.allocate_id("rtbassoc");
        state.table_mut(route_table_id)?.associations.push(Association {
            id: association_id.clone(),
            route_table_id: route_table_id.to_string(),
            subnet_id: Some(subnet_id.to_string()),
            main: false,
        });
        Ok(association_id)
    }

    async fn disassociate_route_table(
        &self,
        association_id: &str,
        dry_run: bool,
    ) -> CloudResult<()> {
        self.enter(Operation::DisassociateRouteTable)?;
        let mut state = self.lock_state();
        let table = state
            .route_tables
            .iter_mut()
            .find(|t| t.associations.iter().any(|a| a.id == association_id))
            .ok_or_else(|| {
                CloudError::new(
                    "InvalidAssociationID.NotFound",
                    format!("The association ID '{}' does not exist", association_id),
                )
            })?;
        if table
            .associations
            .iter()
            .any(|a| a.id == association_id && a.main)
        {
            return Err(CloudError::new(
                "InvalidParameterValue",
                format!("cannot disassociate the main route table association {}", association_id),
            ));
        }
        if !dry_run {
            table.associations.retain(|a| a.id != association_id);
        }
        Ok(())
    }

    async fn describe_tags(&self, resource_id: &str) -> CloudResult<TagSet> {
        self.enter(Operation::DescribeTags)?;
        Ok(self
            .lock_state()
            .tags
            .get(resource_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_tags(&self, resource_id: &str, tags: &TagSet, dry_run: bool) -> CloudResult<()> {
        self.enter(Operation::CreateTags)?;
        let mut state = self.lock_state();
        if !state.resource_exists(resource_id) {
            return Err(resource_not_found(resource_id));
        }
        if !dry_run {
            state
                .tags
                .entry(resource_id.to_string())
                .or_default()
                .extend(tags.clone());
        }
        Ok(())
    }

    async fn delete_tags(&self, resource_id: &str, tags: &TagSet, dry_run: bool) -> CloudResult<()> {
        self.enter(Operation::DeleteTags)?;
        let mut state = self.lock_state();
        if !state.resource_exists(resource_id) {
            return Err(resource_not_found(resource_id));
        }
        if !dry_run {
            if let Some(current) = state.tags.get_mut(resource_id) {
                current.retain(|k, _| !tags.contains_key(k));
            }
        }
        Ok(())
    }

    async fn describe_internet_gateways(&self, vpc_id: &str) -> CloudResult<Vec<InternetGateway>> {
        self.enter(Operation::DescribeInternetGateways)?;
        Ok(self
            .lock_state()
            .internet_gateways
            .iter()
            .filter(|g| g.attachments.iter().any(|v| v == vpc_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet(id: &str, cidr: &str, name: &str) -> Subnet {
        Subnet {
            id: id.to_string(),
            vpc_id: "vpc-1".to_string(),
            cidr_block: cidr.to_string(),
            tags: TagSet::from([("Name".to_string(), name.to_string())]),
        }
    }

    fn vpc() -> MemoryVpc {
        MemoryVpc::new()
            .with_vpc("vpc-1", "10.0.0.0/16")
            .with_subnet(subnet("subnet-a", "10.0.1.0/24", "web"))
            .with_subnet(subnet("subnet-b", "10.0.2.0/24", "db"))
    }

    #[tokio::test]
    async fn test_create_route_table_has_local_route() {
        let vpc = vpc();
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        assert_eq!(table.id, "rtb-00000001");
        assert_eq!(table.routes, vec![Route::local("10.0.0.0/16")]);

        let err = vpc.create_route_table("vpc-404").await.unwrap_err();
        assert_eq!(err.code, "InvalidVpcID.NotFound");
    }

    #[tokio::test]
    async fn test_dry_run_validates_without_mutating() {
        let vpc = vpc();
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        let spec = RouteSpec::new("0.0.0.0/0", RouteTarget::Gateway("igw-1".into()));

        vpc.create_route(&table.id, &spec, true).await.unwrap();
        assert_eq!(vpc.route_table(&table.id).unwrap().routes.len(), 1);

        let err = vpc.create_route("rtb-missing", &spec, true).await.unwrap_err();
        assert_eq!(err.code, "InvalidRouteTableID.NotFound");

        let err = vpc.delete_route(&table.id, "0.0.0.0/0", true).await.unwrap_err();
        assert_eq!(err.code, "InvalidRoute.NotFound");
    }

    #[tokio::test]
    async fn test_propagation_adds_advertised_routes() {
        let vpc = vpc().with_vgw("vgw-1", &["172.16.0.0/12", "10.0.0.0/16"]);
        let table = vpc.create_route_table("vpc-1").await.unwrap();

        vpc.enable_vgw_route_propagation(&table.id, "vgw-1", true)
            .await
            .unwrap();
        assert_eq!(vpc.route_table(&table.id).unwrap().routes.len(), 1);

        vpc.enable_vgw_route_propagation(&table.id, "vgw-1", false)
            .await
            .unwrap();
        vpc.enable_vgw_route_propagation(&table.id, "vgw-1", false)
            .await
            .unwrap();
        let routes = vpc.route_table(&table.id).unwrap().routes;
        assert_eq!(
            routes,
            vec![
                Route::local("10.0.0.0/16"),
                Route::new("172.16.0.0/12", RouteTarget::Gateway("vgw-1".into()))
                    .with_origin(RouteOrigin::EnableVgwRoutePropagation),
            ]
        );
        assert_eq!(vpc.propagating_gateways(&table.id), vec!["vgw-1".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_route_and_local_route_protection() {
        let vpc = vpc();
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        let spec = RouteSpec::new("10.0.0.0/16", RouteTarget::Instance("i-1".into()));
        let err = vpc.create_route(&table.id, &spec, false).await.unwrap_err();
        assert_eq!(err.code, "RouteAlreadyExists");

        let err = vpc.delete_route(&table.id, "10.0.0.0/16", false).await.unwrap_err();
        assert_eq!(err.code, "InvalidParameterValue");
    }

    #[tokio::test]
    async fn test_subnet_association_is_exclusive() {
        let vpc = vpc();
        let first = vpc.create_route_table("vpc-1").await.unwrap();
        let second = vpc.create_route_table("vpc-1").await.unwrap();

        let assoc = vpc.associate_route_table(&first.id, "subnet-a").await.unwrap();
        let err = vpc
            .associate_route_table(&second.id, "subnet-a")
            .await
            .unwrap_err();
        assert_eq!(err.code, "Resource.AlreadyAssociated");

        vpc.disassociate_route_table(&assoc, false).await.unwrap();
        vpc.associate_route_table(&second.id, "subnet-a").await.unwrap();
        assert_eq!(vpc.tables_for_subnet("subnet-a"), vec![second.id.clone()]);

        let found = vpc
            .describe_route_tables("vpc-1", &RouteTableFilter::by_associated_subnet("subnet-a"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, second.id);
    }

    #[tokio::test]
    async fn test_describe_subnets_filters() {
        let vpc = vpc();
        let by_name = vpc
            .describe_subnets("vpc-1", &SubnetFilter::Names(vec!["db".into()]))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "subnet-b");

        let by_cidr = vpc
            .describe_subnets("vpc-1", &SubnetFilter::Cidrs(vec!["10.0.1.0/24".into()]))
            .await
            .unwrap();
        assert_eq!(by_cidr[0].id, "subnet-a");

        let other_vpc = vpc
            .describe_subnets("vpc-2", &SubnetFilter::Ids(vec!["subnet-a".into()]))
            .await
            .unwrap();
        assert!(other_vpc.is_empty());
    }

    #[tokio::test]
    async fn test_tags_merge_and_delete() {
        let vpc = vpc();
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        let tags = TagSet::from([
            ("Name".to_string(), "Public".to_string()),
            ("env".to_string(), "prod".to_string()),
        ]);
        vpc.create_tags(&table.id, &tags, false).await.unwrap();
        let env = TagSet::from([("env".to_string(), "prod".to_string())]);
        vpc.delete_tags(&table.id, &env, false).await.unwrap();
        assert_eq!(
            vpc.describe_tags(&table.id).await.unwrap(),
            TagSet::from([("Name".to_string(), "Public".to_string())])
        );

        let err = vpc.create_tags("rtb-missing", &tags, false).await.unwrap_err();
        assert_eq!(err.code, "InvalidID");
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let vpc = vpc();
        vpc.inject_failure(
            Operation::CreateRouteTable,
            CloudError::new("RequestLimitExceeded", "slow down"),
        );
        let err = vpc.create_route_table("vpc-1").await.unwrap_err();
        assert_eq!(err.code, "RequestLimitExceeded");
        assert_eq!(vpc.count_calls(Operation::CreateRouteTable), 1);

        vpc.clear_failures();
        assert!(vpc.create_route_table("vpc-1").await.is_ok());
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vpc.json");

        let empty = MemoryVpc::load_from_file(&path).unwrap();
        assert!(empty.snapshot().route_tables.is_empty());

        let mut state = VpcState::default();
        state.vpcs.insert("vpc-1".into(), "10.0.0.0/16".into());
        state.internet_gateways.push(InternetGateway {
            id: "igw-1".into(),
            attachments: vec!["vpc-1".into()],
        });
        std::fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        let loaded = MemoryVpc::load_from_file(&path).unwrap();
        assert_eq!(loaded.snapshot().internet_gateways[0].id, "igw-1");
        loaded.save_to_file().unwrap();

        let reloaded = MemoryVpc::load_from_file(&path).unwrap();
        assert_eq!(reloaded.snapshot().vpcs.get("vpc-1").unwrap(), "10.0.0.0/16");
    }
}
