//! Dashboard queries and remediation actions over the two cloud APIs.

use crate::api::{CloudFormationApi, DeploymentTargets, OrganizationsApi};
use crate::cache::InstanceCache;
use crate::config::Config;
use crate::error::{Result, StacksetError};
use crate::model::{InstanceRef, OrganizationAccount, StackInstance, StackSetSummary};
use crate::paginate::collect_pages;
use crate::report::{DashboardReport, StackSetReport};
use crate::selection::{group_by_target, select_instances, undeployed_accounts, IgnoreSet};
use crate::types::{AccountStatus, InstanceStatusFilter, RetryKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Region new stack instances are created in.
    pub region: String,
    pub retain_stacks: bool,
}

impl Settings {
    /// `resolved_region` is what the AWS provider chain settled on; an explicit
    /// region in the config wins.
    pub fn from_config(config: &Config, resolved_region: Option<String>) -> Result<Self> {
        let region = config
            .region
            .clone()
            .or(resolved_region)
            .filter(|r| !r.is_empty())
            .ok_or(StacksetError::MissingRegion)?;
        Ok(Self {
            region,
            retain_stacks: config.retain_stacks,
        })
    }
}

// ---------------------------------------------------------------------------
// Remediation
// ---------------------------------------------------------------------------

/// What a remediation action did (or would do).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Remediation<T> {
    /// Nothing matched; no call was made.
    NothingFound,
    DryRun { targets: Vec<T> },
    Applied {
        targets: Vec<T>,
        operation_ids: Vec<String>,
    },
}

impl<T> Remediation<T> {
    pub fn targets(&self) -> &[T] {
        match self {
            Remediation::NothingFound => &[],
            Remediation::DryRun { targets } | Remediation::Applied { targets, .. } => targets,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Remediation::DryRun { .. })
    }
}

// ---------------------------------------------------------------------------
// StackSetService
// ---------------------------------------------------------------------------

pub struct StackSetService {
    cloudformation: Arc<dyn CloudFormationApi>,
    organizations: Arc<dyn OrganizationsApi>,
    cache: InstanceCache,
    settings: Settings,
}

impl StackSetService {
    pub fn new(
        cloudformation: Arc<dyn CloudFormationApi>,
        organizations: Arc<dyn OrganizationsApi>,
        settings: Settings,
    ) -> Self {
        Self {
            cloudformation,
            organizations,
            cache: InstanceCache::default(),
            settings,
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = InstanceCache::new(capacity);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    // -- queries -----------------------------------------------------------

    /// Every member account, in the order Organizations returns them.
    pub async fn organization_accounts(&self) -> Result<Vec<OrganizationAccount>> {
        collect_pages(|token| self.organizations.list_accounts(token)).await
    }

    pub async fn organization_accounts_by_name(&self) -> Result<Vec<OrganizationAccount>> {
        let mut accounts = self.organization_accounts().await?;
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    pub async fn organization_root_id(&self) -> Result<String> {
        let roots = self
            .organizations
            .list_roots()
            .await
            .map_err(|e| StacksetError::RootLookup(e.to_string()))?;
        roots
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or(StacksetError::NoOrganizationRoot)
    }

    pub async fn stack_sets(&self) -> Result<Vec<StackSetSummary>> {
        collect_pages(|token| self.cloudformation.list_stack_sets(token)).await
    }

    /// Instances of a stack set, served from the cache when present.
    pub async fn stack_instances(&self, stack_set_name: &str) -> Result<Arc<Vec<StackInstance>>> {
        self.cache
            .get_or_fetch(stack_set_name, async {
                tracing::debug!(stack_set = stack_set_name, "instance cache miss");
                collect_pages(|token| {
                    self.cloudformation
                        .list_stack_instances(stack_set_name, token)
                })
                .await
            })
            .await
    }

    pub async fn instances(
        &self,
        stack_set_name: &str,
        filter: InstanceStatusFilter,
        ignore: &IgnoreSet,
    ) -> Result<Vec<InstanceRef>> {
        let instances = self.stack_instances(stack_set_name).await?;
        Ok(select_instances(&instances, filter, ignore))
    }

    /// Health of every ACTIVE stack set. Instance listings are re-fetched for
    /// each stack set: the cache is cleared first.
    pub async fn dashboard(&self) -> Result<DashboardReport> {
        let stack_sets = self.stack_sets().await?;
        let accounts = self.organization_accounts().await?;

        let mut reports = Vec::with_capacity(stack_sets.len());
        for summary in &stack_sets {
            let name = &summary.stack_set_name;
            let detail = self.cloudformation.describe_stack_set(name).await?;
            self.cache.clear();
            let instances = self.stack_instances(name).await?;
            reports.push(StackSetReport::build(
                name,
                detail.auto_deployment,
                &instances,
                &accounts,
            ));
        }

        tracing::info!(
            stack_sets = reports.len(),
            accounts = accounts.len(),
            "dashboard built"
        );
        Ok(DashboardReport {
            generated_at: chrono::Utc::now(),
            total_organization_accounts: accounts.len(),
            stack_sets: reports,
        })
    }

    // -- actions -----------------------------------------------------------

    /// Deploy the stack set to every organization account that has no instance
    /// yet, one `CreateStackInstances` per account in the configured region.
    /// Never reports `NothingFound`: an empty target list is still a result.
    pub async fn add_undeployed_accounts(
        &self,
        stack_set_name: &str,
        dry_run: bool,
        ignore: &IgnoreSet,
    ) -> Result<Remediation<OrganizationAccount>> {
        let accounts = self.organization_accounts().await?;
        let instances = self.stack_instances(stack_set_name).await?;
        let missing = undeployed_accounts(&accounts, &instances, ignore);

        if dry_run {
            return Ok(Remediation::DryRun { targets: missing });
        }
        if missing.is_empty() {
            return Ok(Remediation::Applied {
                targets: missing,
                operation_ids: Vec::new(),
            });
        }

        let root_id = self.organization_root_id().await?;
        let result = self.create_for_accounts(stack_set_name, &missing, &root_id).await;
        self.cache.invalidate(stack_set_name).await;
        let operation_ids = result?;

        Ok(Remediation::Applied {
            targets: missing,
            operation_ids,
        })
    }

    async fn create_for_accounts(
        &self,
        stack_set_name: &str,
        accounts: &[OrganizationAccount],
        root_id: &str,
    ) -> Result<Vec<String>> {
        let mut operation_ids = Vec::new();
        for account in accounts {
            tracing::info!(
                stack_set = stack_set_name,
                account = %account.id,
                region = %self.settings.region,
                "creating stack instance"
            );
            let op = self
                .cloudformation
                .create_stack_instances(
                    stack_set_name,
                    DeploymentTargets::accounts_in(vec![account.id.clone()], Some(root_id)),
                    vec![self.settings.region.clone()],
                )
                .await?;
            operation_ids.extend(op);
        }
        Ok(operation_ids)
    }

    /// Remove instances that were skipped because their account is suspended.
    ///
    /// Each candidate account is described once: `SUSPENDED` accounts are
    /// removed, accounts that cannot be described are treated as `Deleted` and
    /// removed too, anything else is left alone. Targets are grouped by
    /// (OU, region) and each group is removed with one call.
    pub async fn remove_suspended_accounts(
        &self,
        stack_set_name: &str,
        dry_run: bool,
        ignore: &IgnoreSet,
    ) -> Result<Remediation<InstanceRef>> {
        let instances = self.stack_instances(stack_set_name).await?;
        let candidates = select_instances(
            &instances,
            InstanceStatusFilter::SkippedSuspendedAccount,
            ignore,
        );
        if candidates.is_empty() {
            return Ok(Remediation::NothingFound);
        }

        let mut statuses: HashMap<String, Option<AccountStatus>> = HashMap::new();
        for candidate in &candidates {
            if statuses.contains_key(&candidate.account) {
                continue;
            }
            let status = match self.organizations.describe_account(&candidate.account).await {
                Ok(account) => account.status,
                Err(e) => {
                    tracing::warn!(
                        account = %candidate.account,
                        error = %e,
                        "describe account failed; treating as deleted"
                    );
                    Some(AccountStatus::Deleted)
                }
            };
            statuses.insert(candidate.account.clone(), status);
        }

        let targets: Vec<InstanceRef> = candidates
            .into_iter()
            .filter_map(|mut target| {
                let status = statuses.get(&target.account).cloned().flatten()?;
                let removable = matches!(status, AccountStatus::Suspended | AccountStatus::Deleted);
                removable.then(|| {
                    target.status = Some(status);
                    target
                })
            })
            .collect();

        if targets.is_empty() {
            return Ok(Remediation::NothingFound);
        }
        if dry_run {
            return Ok(Remediation::DryRun { targets });
        }

        let result = self.delete_grouped(stack_set_name, &targets).await;
        self.cache.invalidate(stack_set_name).await;
        let operation_ids = result?;

        Ok(Remediation::Applied {
            targets,
            operation_ids,
        })
    }

    async fn delete_grouped(&self, stack_set_name: &str, targets: &[InstanceRef]) -> Result<Vec<String>> {
        let mut operation_ids = Vec::new();
        for group in group_by_target(targets.to_vec()) {
            tracing::info!(
                stack_set = stack_set_name,
                ou = group.organizational_unit_id.as_deref().unwrap_or("-"),
                region = %group.region,
                accounts = group.members.len(),
                "deleting stack instances"
            );
            let op = self
                .cloudformation
                .delete_stack_instances(
                    stack_set_name,
                    DeploymentTargets::accounts_in(
                        group.account_ids(),
                        group.organizational_unit_id.as_deref(),
                    ),
                    vec![group.region.clone()],
                    self.settings.retain_stacks,
                )
                .await?;
            operation_ids.extend(op);
        }
        Ok(operation_ids)
    }

    /// Re-run `UpdateStackInstances` for each failed or drifted instance,
    /// targeting exactly that instance's account, OU and region.
    pub async fn retry_instances(
        &self,
        stack_set_name: &str,
        kind: RetryKind,
        dry_run: bool,
        ignore: &IgnoreSet,
    ) -> Result<Remediation<InstanceRef>> {
        let targets = self.instances(stack_set_name, kind.filter(), ignore).await?;
        if targets.is_empty() {
            return Ok(Remediation::NothingFound);
        }
        if dry_run {
            return Ok(Remediation::DryRun { targets });
        }

        let result = self.update_each(stack_set_name, kind, &targets).await;
        self.cache.invalidate(stack_set_name).await;
        let operation_ids = result?;

        Ok(Remediation::Applied {
            targets,
            operation_ids,
        })
    }

    async fn update_each(
        &self,
        stack_set_name: &str,
        kind: RetryKind,
        targets: &[InstanceRef],
    ) -> Result<Vec<String>> {
        let mut operation_ids = Vec::new();
        for target in targets {
            tracing::info!(
                stack_set = stack_set_name,
                account = %target.account,
                region = %target.region,
                kind = %kind,
                "retrying stack instance"
            );
            let op = self
                .cloudformation
                .update_stack_instances(
                    stack_set_name,
                    DeploymentTargets::accounts_in(
                        vec![target.account.clone()],
                        target.organizational_unit_id.as_deref(),
                    ),
                    vec![target.region.clone()],
                )
                .await?;
            operation_ids.extend(op);
        }
        Ok(operation_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeCloudFormation, FakeOrganizations, Mutation};
    use crate::model::{AutoDeployment, OrganizationRoot};
    use crate::selection::ignore_set;
    use crate::types::{DetailedStatus, DriftStatus};

    const STACK_SET: &str = "baseline";

    fn settings() -> Settings {
        Settings {
            region: "us-east-1".into(),
            retain_stacks: true,
        }
    }

    fn service(cfn: &Arc<FakeCloudFormation>, orgs: &Arc<FakeOrganizations>) -> StackSetService {
        StackSetService::new(cfn.clone(), orgs.clone(), settings())
    }

    fn organization() -> Arc<FakeOrganizations> {
        let orgs = FakeOrganizations::new()
            .with_root(OrganizationRoot {
                id: "r-root".into(),
                arn: None,
                name: Some("Root".into()),
            })
            .with_account(OrganizationAccount::new("111111111111", "prod"))
            .with_account(OrganizationAccount::new("222222222222", "staging"))
            .with_account(
                OrganizationAccount::new("333333333333", "old-sandbox")
                    .with_status(AccountStatus::Suspended),
            )
            .with_account(OrganizationAccount::new("444444444444", "analytics"))
            .with_page_size(2);
        Arc::new(orgs)
    }

    fn cloudformation() -> Arc<FakeCloudFormation> {
        Arc::new(baseline_stack_set())
    }

    fn baseline_stack_set() -> FakeCloudFormation {
        FakeCloudFormation::new()
            .with_stack_set(
                STACK_SET,
                AutoDeployment {
                    enabled: Some(true),
                    retain_stacks_on_account_removal: Some(true),
                },
                vec![
                    StackInstance::new("111111111111", "us-east-1")
                        .with_ou("ou-a")
                        .with_drift(DriftStatus::InSync)
                        .with_detailed_status(DetailedStatus::Succeeded),
                    StackInstance::new("222222222222", "us-east-1")
                        .with_ou("ou-a")
                        .with_drift(DriftStatus::Drifted)
                        .with_detailed_status(DetailedStatus::Failed),
                    StackInstance::new("333333333333", "us-east-1")
                        .with_ou("ou-a")
                        .with_detailed_status(DetailedStatus::SkippedSuspendedAccount),
                    StackInstance::new("999999999999", "eu-west-1")
                        .with_ou("ou-b")
                        .with_detailed_status(DetailedStatus::SkippedSuspendedAccount),
                ],
            )
            .with_page_size(1)
    }

    #[tokio::test]
    async fn accounts_walk_all_pages_and_sort_by_name() {
        let orgs = organization();
        let svc = service(&cloudformation(), &orgs);

        let accounts = svc.organization_accounts().await.unwrap();
        assert_eq!(accounts.len(), 4);
        assert_eq!(accounts[0].id, "111111111111");

        let sorted = svc.organization_accounts_by_name().await.unwrap();
        let names: Vec<_> = sorted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["analytics", "old-sandbox", "prod", "staging"]);
    }

    #[tokio::test]
    async fn instance_listing_is_cached() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        svc.stack_instances(STACK_SET).await.unwrap();
        let calls = cfn.list_instance_calls();
        svc.stack_instances(STACK_SET).await.unwrap();
        assert_eq!(cfn.list_instance_calls(), calls);
        // one call per page of one instance each
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn dashboard_reports_counts_and_clears_cache() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());
        svc.stack_instances(STACK_SET).await.unwrap();

        let report = svc.dashboard().await.unwrap();
        assert_eq!(report.total_organization_accounts, 4);
        assert_eq!(report.stack_sets.len(), 1);

        let row = &report.stack_sets[0];
        assert_eq!(row.stack_set_name, STACK_SET);
        assert_eq!(row.auto_deployment.enabled, Some(true));
        assert_eq!(row.total_instances, 4);
        assert_eq!(row.in_sync, 1);
        assert_eq!(row.drifted, 1);
        assert_eq!(row.succeeded, 1);
        assert_eq!(row.failed, 1);
        assert_eq!(row.skipped_suspended_account, 2);
        assert_eq!(row.not_deployed_accounts, 1);
        assert_eq!(row.not_deployed_account_details[0].id, "444444444444");
        // refetched despite the warm cache
        assert_eq!(cfn.list_instance_calls(), 8);
    }

    #[tokio::test]
    async fn add_undeployed_dry_run_makes_no_calls() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        let outcome = svc
            .add_undeployed_accounts(STACK_SET, true, &IgnoreSet::new())
            .await
            .unwrap();
        assert!(outcome.is_dry_run());
        assert_eq!(outcome.targets().len(), 1);
        assert_eq!(outcome.targets()[0].id, "444444444444");
        assert!(cfn.mutations().is_empty());
    }

    #[tokio::test]
    async fn add_undeployed_creates_one_instance_per_account() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        let outcome = svc
            .add_undeployed_accounts(STACK_SET, false, &IgnoreSet::new())
            .await
            .unwrap();

        assert!(matches!(outcome, Remediation::Applied { .. }));
        let mutations = cfn.mutations();
        assert_eq!(mutations.len(), 1);
        match &mutations[0] {
            Mutation::Create {
                stack_set,
                targets,
                regions,
            } => {
                assert_eq!(stack_set, STACK_SET);
                assert_eq!(
                    *targets,
                    DeploymentTargets::accounts_in(vec!["444444444444".into()], Some("r-root"))
                );
                assert_eq!(*regions, vec!["us-east-1".to_string()]);
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_undeployed_respects_ignore_list() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        let outcome = svc
            .add_undeployed_accounts(STACK_SET, false, &ignore_set(["444444444444"]))
            .await
            .unwrap();
        assert!(outcome.targets().is_empty());
        assert!(cfn.mutations().is_empty());
    }

    #[tokio::test]
    async fn add_undeployed_without_root_fails() {
        let cfn = cloudformation();
        let orgs = Arc::new(
            FakeOrganizations::new().with_account(OrganizationAccount::new("555555555555", "x")),
        );
        let svc = service(&cfn, &orgs);

        let err = svc
            .add_undeployed_accounts(STACK_SET, false, &IgnoreSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StacksetError::NoOrganizationRoot));
        assert!(err.to_string().starts_with("Failed to retrieve organization root OU ID"));
    }

    #[tokio::test]
    async fn remove_suspended_keeps_suspended_and_deleted_accounts() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        // 333 is SUSPENDED; 999 is unknown to Organizations, so it is "Deleted"
        let outcome = svc
            .remove_suspended_accounts(STACK_SET, true, &IgnoreSet::new())
            .await
            .unwrap();

        let targets = outcome.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].account, "333333333333");
        assert_eq!(targets[0].status, Some(AccountStatus::Suspended));
        assert_eq!(targets[1].account, "999999999999");
        assert_eq!(targets[1].status, Some(AccountStatus::Deleted));
        assert!(cfn.mutations().is_empty());
    }

    #[tokio::test]
    async fn remove_suspended_deletes_every_group() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        svc.remove_suspended_accounts(STACK_SET, false, &IgnoreSet::new())
            .await
            .unwrap();

        let mutations = cfn.mutations();
        assert_eq!(mutations.len(), 2);
        let regions: Vec<_> = mutations
            .iter()
            .map(|m| match m {
                Mutation::Delete {
                    regions,
                    retain_stacks,
                    ..
                } => {
                    assert!(*retain_stacks);
                    regions[0].clone()
                }
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        assert_eq!(regions, vec!["us-east-1", "eu-west-1"]);
    }

    #[tokio::test]
    async fn remove_suspended_skips_active_accounts() {
        let cfn = Arc::new(FakeCloudFormation::new().with_stack_set(
            STACK_SET,
            AutoDeployment::default(),
            vec![StackInstance::new("111111111111", "us-east-1")
                .with_ou("ou-a")
                .with_detailed_status(DetailedStatus::SkippedSuspendedAccount)],
        ));
        let svc = service(&cfn, &organization());

        let outcome = svc
            .remove_suspended_accounts(STACK_SET, false, &IgnoreSet::new())
            .await
            .unwrap();
        assert_eq!(outcome, Remediation::NothingFound);
        assert!(cfn.mutations().is_empty());
    }

    #[tokio::test]
    async fn remove_suspended_with_nothing_skipped() {
        let cfn = cloudformation();
        let orgs = organization();
        let svc = service(&cfn, &orgs);

        let outcome = svc
            .remove_suspended_accounts(
                STACK_SET,
                false,
                &ignore_set(["333333333333", "999999999999"]),
            )
            .await
            .unwrap();
        assert_eq!(outcome, Remediation::NothingFound);
        assert_eq!(orgs.describe_calls(), 0);
    }

    #[tokio::test]
    async fn retry_failed_updates_each_instance() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        let outcome = svc
            .retry_instances(STACK_SET, RetryKind::Failed, false, &IgnoreSet::new())
            .await
            .unwrap();
        assert_eq!(outcome.targets().len(), 1);
        assert_eq!(outcome.targets()[0].account, "222222222222");

        let mutations = cfn.mutations();
        assert_eq!(mutations.len(), 1);
        match &mutations[0] {
            Mutation::Update { targets, regions, .. } => {
                assert_eq!(targets.accounts, vec!["222222222222".to_string()]);
                assert_eq!(targets.organizational_unit_ids, vec!["ou-a".to_string()]);
                assert_eq!(*regions, vec!["us-east-1".to_string()]);
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[tokio::test]
    async fn retry_invalidates_cache() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        svc.retry_instances(STACK_SET, RetryKind::Drifted, false, &IgnoreSet::new())
            .await
            .unwrap();
        assert!(svc.cache().get(STACK_SET).await.is_none());
    }

    #[tokio::test]
    async fn failed_mutations_still_invalidate_cache() {
        let cfn = Arc::new(baseline_stack_set().failing_mutations("LimitExceeded"));
        let svc = service(&cfn, &organization());
        let none = IgnoreSet::new();

        svc.stack_instances(STACK_SET).await.unwrap();
        let err = svc
            .retry_instances(STACK_SET, RetryKind::Failed, false, &none)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "UpdateStackInstances failed: LimitExceeded");
        assert!(svc.cache().get(STACK_SET).await.is_none());

        svc.stack_instances(STACK_SET).await.unwrap();
        let err = svc
            .remove_suspended_accounts(STACK_SET, false, &none)
            .await
            .unwrap_err();
        assert!(matches!(err, StacksetError::Aws { operation: "DeleteStackInstances", .. }));
        assert!(svc.cache().get(STACK_SET).await.is_none());

        svc.stack_instances(STACK_SET).await.unwrap();
        let err = svc
            .add_undeployed_accounts(STACK_SET, false, &none)
            .await
            .unwrap_err();
        assert!(matches!(err, StacksetError::Aws { operation: "CreateStackInstances", .. }));
        assert!(svc.cache().get(STACK_SET).await.is_none());

        // one attempt per action before each failure surfaced
        assert_eq!(cfn.mutations().len(), 3);
    }

    #[tokio::test]
    async fn each_suspended_account_is_described_once() {
        let cfn = Arc::new(FakeCloudFormation::new().with_stack_set(
            STACK_SET,
            AutoDeployment::default(),
            vec![
                StackInstance::new("333333333333", "us-east-1")
                    .with_ou("ou-a")
                    .with_detailed_status(DetailedStatus::SkippedSuspendedAccount),
                StackInstance::new("333333333333", "eu-west-1")
                    .with_ou("ou-a")
                    .with_detailed_status(DetailedStatus::SkippedSuspendedAccount),
            ],
        ));
        let orgs = organization();
        let svc = service(&cfn, &orgs);

        let outcome = svc
            .remove_suspended_accounts(STACK_SET, true, &IgnoreSet::new())
            .await
            .unwrap();

        assert_eq!(orgs.describe_calls(), 1);
        let regions: Vec<_> = outcome.targets().iter().map(|t| t.region.as_str()).collect();
        assert_eq!(regions, vec!["us-east-1", "eu-west-1"]);
        assert!(outcome
            .targets()
            .iter()
            .all(|t| t.status == Some(AccountStatus::Suspended)));
    }

    #[tokio::test]
    async fn retry_drifted_dry_run_and_nothing_found() {
        let cfn = cloudformation();
        let svc = service(&cfn, &organization());

        let dry = svc
            .retry_instances(STACK_SET, RetryKind::Drifted, true, &IgnoreSet::new())
            .await
            .unwrap();
        assert!(dry.is_dry_run());
        assert_eq!(dry.targets()[0].account, "222222222222");

        let none = svc
            .retry_instances(STACK_SET, RetryKind::Drifted, false, &ignore_set(["222222222222"]))
            .await
            .unwrap();
        assert_eq!(none, Remediation::NothingFound);
        assert!(cfn.mutations().is_empty());
    }

    #[tokio::test]
    async fn unknown_stack_set_is_not_found() {
        let svc = service(&cloudformation(), &organization());
        let err = svc.stack_instances("missing").await.unwrap_err();
        assert!(matches!(err, StacksetError::StackSetNotFound(name) if name == "missing"));
    }

    #[test]
    fn settings_require_a_region() {
        let config = Config::default();
        assert!(matches!(
            Settings::from_config(&config, None),
            Err(StacksetError::MissingRegion)
        ));
        let settings = Settings::from_config(&config, Some("eu-west-1".into())).unwrap();
        assert_eq!(settings.region, "eu-west-1");

        let mut explicit = Config::default();
        explicit.region = Some("us-west-2".into());
        let settings = Settings::from_config(&explicit, Some("eu-west-1".into())).unwrap();
        assert_eq!(settings.region, "us-west-2");
    }
}
