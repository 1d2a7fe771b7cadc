//! Resource tag reconciliation.

use crate::cloud::{TagSet, VpcClient};
use crate::reconcile::error::{ReconcileResult, Step, StepContext};

/// Tags to delete and to create (or overwrite) to reach `desired`.
pub fn diff_tags(current: &TagSet, desired: &TagSet, add_only: bool) -> (TagSet, TagSet) {
    let to_delete = if add_only {
        TagSet::new()
    } else {
        current
            .iter()
            .filter(|(k, _)| !desired.contains_key(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    };

    let to_add = desired
        .iter()
        .filter(|(k, v)| current.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    (to_delete, to_add)
}

/// Make `resource_id` carry `desired`. In add-only mode extra tags are kept.
pub async fn ensure_tags<C: VpcClient>(
    client: &C,
    resource_id: &str,
    desired: &TagSet,
    add_only: bool,
    check_mode: bool,
) -> ReconcileResult<bool> {
    let current = client
        .describe_tags(resource_id)
        .await
        .step(Step::UpdateTags, resource_id)?;
    if &current == desired {
        return Ok(false);
    }

    let (to_delete, to_add) = diff_tags(&current, desired, add_only);

    if !to_delete.is_empty() {
        tracing::info!(resource_id, keys = ?to_delete.keys().collect::<Vec<_>>(), check_mode, "Deleting tags");
        client
            .delete_tags(resource_id, &to_delete, check_mode)
            .await
            .step(Step::UpdateTags, resource_id)?;
    }

    if !to_add.is_empty() {
        tracing::info!(resource_id, keys = ?to_add.keys().collect::<Vec<_>>(), check_mode, "Creating tags");
        client
            .create_tags(resource_id, &to_add, check_mode)
            .await
            .step(Step::UpdateTags, resource_id)?;
    }

    Ok(!to_delete.is_empty() || !to_add.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::MemoryVpc;

    fn tags(pairs: &[(&str, &str)]) -> TagSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_tags() {
        let current = tags(&[("Name", "Old"), ("team", "net")]);
        let desired = tags(&[("Name", "Public"), ("env", "prod")]);

        let (delete, add) = diff_tags(&current, &desired, false);
        assert_eq!(delete, tags(&[("team", "net")]));
        assert_eq!(add, desired);

        let (delete, add) = diff_tags(&current, &desired, true);
        assert!(delete.is_empty());
        assert_eq!(add, desired);
    }

    #[tokio::test]
    async fn test_full_sync_removes_extra_tags() {
        let vpc = MemoryVpc::new().with_vpc("vpc-1", "10.0.0.0/16");
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        vpc.create_tags(&table.id, &tags(&[("team", "net")]), false)
            .await
            .unwrap();

        let desired = tags(&[("Name", "Public")]);
        assert!(ensure_tags(&vpc, &table.id, &desired, false, false).await.unwrap());
        assert_eq!(vpc.tags_of(&table.id), desired);
        assert!(!ensure_tags(&vpc, &table.id, &desired, false, false).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_only_superset_is_unchanged() {
        let vpc = MemoryVpc::new().with_vpc("vpc-1", "10.0.0.0/16");
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        vpc.create_tags(&table.id, &tags(&[("Name", "Public"), ("team", "net")]), false)
            .await
            .unwrap();

        let desired = tags(&[("Name", "Public")]);
        assert!(!ensure_tags(&vpc, &table.id, &desired, true, false).await.unwrap());
        assert_eq!(vpc.tags_of(&table.id).len(), 2);
    }

    #[tokio::test]
    async fn test_check_mode_leaves_tags() {
        let vpc = MemoryVpc::new().with_vpc("vpc-1", "10.0.0.0/16");
        let table = vpc.create_route_table("vpc-1").await.unwrap();
        let desired = tags(&[("Name", "Public")]);
        assert!(ensure_tags(&vpc, &table.id, &desired, true, true).await.unwrap());
        assert!(vpc.tags_of(&table.id).is_empty());
    }
}
