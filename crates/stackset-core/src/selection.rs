use crate::model::{InstanceRef, OrganizationAccount, StackInstance};
use crate::types::{DetailedStatus, DriftStatus, InstanceStatusFilter};
use serde::Serialize;
use std::collections::HashSet;

/// Account ids callers asked to leave alone.
pub type IgnoreSet = HashSet<String>;

pub fn ignore_set<I, S>(accounts: I) -> IgnoreSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    accounts.into_iter().map(Into::into).collect()
}

pub fn matches(instance: &StackInstance, filter: InstanceStatusFilter) -> bool {
    match filter {
        InstanceStatusFilter::InSync => instance.drift_status == DriftStatus::InSync,
        InstanceStatusFilter::Drifted => instance.drift_status == DriftStatus::Drifted,
        InstanceStatusFilter::Succeeded => {
            instance.detailed_status == Some(DetailedStatus::Succeeded)
        }
        InstanceStatusFilter::Failed => instance.detailed_status == Some(DetailedStatus::Failed),
        InstanceStatusFilter::SkippedSuspendedAccount => {
            instance.detailed_status == Some(DetailedStatus::SkippedSuspendedAccount)
        }
    }
}

/// Instances in the `filter` bucket whose account is not ignored, in listing
/// order.
pub fn select_instances(
    instances: &[StackInstance],
    filter: InstanceStatusFilter,
    ignore: &IgnoreSet,
) -> Vec<InstanceRef> {
    instances
        .iter()
        .filter(|i| matches(i, filter) && !ignore.contains(&i.account))
        .map(StackInstance::to_ref)
        .collect()
}

pub fn deployed_account_ids(instances: &[StackInstance]) -> HashSet<&str> {
    instances.iter().map(|i| i.account.as_str()).collect()
}

/// Organization accounts (in organization order) with no instance of the
/// stack set, minus ignored accounts.
pub fn undeployed_accounts(
    accounts: &[OrganizationAccount],
    instances: &[StackInstance],
    ignore: &IgnoreSet,
) -> Vec<OrganizationAccount> {
    let deployed = deployed_account_ids(instances);
    accounts
        .iter()
        .filter(|a| !deployed.contains(a.id.as_str()) && !ignore.contains(&a.id))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Targets sharing an (organizational unit, region) pair, which a single
/// delete call can cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetGroup {
    pub organizational_unit_id: Option<String>,
    pub region: String,
    pub members: Vec<InstanceRef>,
}

impl TargetGroup {
    pub fn account_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.account.clone()).collect()
    }
}

/// Group targets by (OU, region), keeping first-seen group order and member
/// order.
pub fn group_by_target(refs: Vec<InstanceRef>) -> Vec<TargetGroup> {
    let mut groups: Vec<TargetGroup> = Vec::new();
    for r in refs {
        let existing = groups
            .iter_mut()
            .find(|g| g.organizational_unit_id == r.organizational_unit_id && g.region == r.region);
        match existing {
            Some(group) => group.members.push(r),
            None => groups.push(TargetGroup {
                organizational_unit_id: r.organizational_unit_id.clone(),
                region: r.region.clone(),
                members: vec![r],
            }),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// InstanceCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstanceCounts {
    pub total: usize,
    pub in_sync: usize,
    pub drifted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_suspended_account: usize,
}

impl InstanceCounts {
    pub fn tally(instances: &[StackInstance]) -> Self {
        let count = |filter| instances.iter().filter(|i| matches(i, filter)).count();
        Self {
            total: instances.len(),
            in_sync: count(InstanceStatusFilter::InSync),
            drifted: count(InstanceStatusFilter::Drifted),
            succeeded: count(InstanceStatusFilter::Succeeded),
            failed: count(InstanceStatusFilter::Failed),
            skipped_suspended_account: count(InstanceStatusFilter::SkippedSuspendedAccount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetailedStatus as D;
    use crate::types::DriftStatus as Drift;

    fn fleet() -> Vec<StackInstance> {
        vec![
            StackInstance::new("111111111111", "us-east-1")
                .with_ou("ou-a")
                .with_drift(Drift::InSync)
                .with_detailed_status(D::Succeeded),
            StackInstance::new("222222222222", "us-east-1")
                .with_ou("ou-a")
                .with_drift(Drift::Drifted)
                .with_detailed_status(D::Succeeded),
            StackInstance::new("333333333333", "eu-west-1")
                .with_ou("ou-b")
                .with_detailed_status(D::Failed),
            StackInstance::new("444444444444", "us-east-1")
                .with_ou("ou-a")
                .with_detailed_status(D::SkippedSuspendedAccount),
            StackInstance::new("111111111111", "eu-west-1")
                .with_ou("ou-a")
                .with_drift(Drift::Drifted)
                .with_detailed_status(D::Failed),
        ]
    }

    #[test]
    fn select_drifted_keeps_order() {
        let refs = select_instances(&fleet(), InstanceStatusFilter::Drifted, &IgnoreSet::new());
        let accounts: Vec<_> = refs.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(accounts, vec!["222222222222", "111111111111"]);
        assert_eq!(refs[1].region, "eu-west-1");
    }

    #[test]
    fn select_skips_ignored_accounts() {
        let ignore = ignore_set(["111111111111"]);
        let refs = select_instances(&fleet(), InstanceStatusFilter::Failed, &ignore);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].account, "333333333333");
    }

    #[test]
    fn not_checked_is_neither_in_sync_nor_drifted() {
        let instances = vec![StackInstance::new("1", "us-east-1")];
        assert!(select_instances(&instances, InstanceStatusFilter::InSync, &IgnoreSet::new()).is_empty());
        assert!(select_instances(&instances, InstanceStatusFilter::Drifted, &IgnoreSet::new()).is_empty());
    }

    #[test]
    fn undeployed_is_org_minus_deployed_minus_ignored() {
        let accounts = vec![
            OrganizationAccount::new("111111111111", "prod"),
            OrganizationAccount::new("555555555555", "new-team"),
            OrganizationAccount::new("666666666666", "sandbox"),
        ];
        let ignore = ignore_set(["666666666666"]);
        let missing = undeployed_accounts(&accounts, &fleet(), &ignore);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "new-team");
    }

    #[test]
    fn grouping_by_ou_and_region() {
        let refs: Vec<_> = fleet().iter().map(StackInstance::to_ref).collect();
        let groups = group_by_target(refs);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].organizational_unit_id.as_deref(), Some("ou-a"));
        assert_eq!(groups[0].region, "us-east-1");
        assert_eq!(
            groups[0].account_ids(),
            vec!["111111111111", "222222222222", "444444444444"]
        );
        assert_eq!(groups[1].organizational_unit_id.as_deref(), Some("ou-b"));
        assert_eq!(groups[2].region, "eu-west-1");
        assert_eq!(groups[2].account_ids(), vec!["111111111111"]);
    }

    #[test]
    fn tally_counts_each_bucket() {
        let counts = InstanceCounts::tally(&fleet());
        assert_eq!(
            counts,
            InstanceCounts {
                total: 5,
                in_sync: 1,
                drifted: 2,
                succeeded: 2,
                failed: 2,
                skipped_suspended_account: 1,
            }
        );
    }
}
