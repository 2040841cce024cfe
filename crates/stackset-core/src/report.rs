use crate::model::{AutoDeployment, OrganizationAccount, StackInstance};
use crate::selection::{undeployed_accounts, IgnoreSet, InstanceCounts};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health of one stack set across the organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSetReport {
    pub stack_set_name: String,
    pub auto_deployment: AutoDeployment,
    pub total_instances: usize,
    pub in_sync: usize,
    pub drifted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_suspended_account: usize,
    pub not_deployed_accounts: usize,
    pub not_deployed_account_details: Vec<OrganizationAccount>,
}

impl StackSetReport {
    pub fn build(
        stack_set_name: impl Into<String>,
        auto_deployment: AutoDeployment,
        instances: &[StackInstance],
        accounts: &[OrganizationAccount],
    ) -> Self {
        let counts = InstanceCounts::tally(instances);
        let missing = undeployed_accounts(accounts, instances, &IgnoreSet::new());
        Self {
            stack_set_name: stack_set_name.into(),
            auto_deployment,
            total_instances: counts.total,
            in_sync: counts.in_sync,
            drifted: counts.drifted,
            succeeded: counts.succeeded,
            failed: counts.failed,
            skipped_suspended_account: counts.skipped_suspended_account,
            not_deployed_accounts: missing.len(),
            not_deployed_account_details: missing,
        }
    }

    /// True when every organization account has a succeeded, in-sync instance.
    pub fn is_healthy(&self) -> bool {
        self.not_deployed_accounts == 0
            && self.failed == 0
            && self.drifted == 0
            && self.skipped_suspended_account == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub total_organization_accounts: usize,
    pub stack_sets: Vec<StackSetReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetailedStatus, DriftStatus};

    #[test]
    fn build_counts_and_lists_missing_accounts() {
        let instances = vec![
            StackInstance::new("111111111111", "us-east-1")
                .with_drift(DriftStatus::InSync)
                .with_detailed_status(DetailedStatus::Succeeded),
            StackInstance::new("222222222222", "us-east-1")
                .with_drift(DriftStatus::Drifted)
                .with_detailed_status(DetailedStatus::Failed),
        ];
        let accounts = vec![
            OrganizationAccount::new("111111111111", "prod"),
            OrganizationAccount::new("222222222222", "staging"),
            OrganizationAccount::new("333333333333", "dev"),
        ];
        let auto = AutoDeployment {
            enabled: Some(true),
            retain_stacks_on_account_removal: Some(false),
        };

        let report = StackSetReport::build("baseline", auto, &instances, &accounts);

        assert_eq!(report.total_instances, 2);
        assert_eq!(report.in_sync, 1);
        assert_eq!(report.drifted, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.not_deployed_accounts, 1);
        assert_eq!(report.not_deployed_account_details[0].id, "333333333333");
        assert!(!report.is_healthy());
    }

    #[test]
    fn serializes_with_dashboard_keys() {
        let report = StackSetReport::build("baseline", AutoDeployment::default(), &[], &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["StackSetName"], "baseline");
        assert_eq!(json["AutoDeployment"], serde_json::json!({}));
        assert_eq!(json["SkippedSuspendedAccount"], 0);
        assert_eq!(json["NotDeployedAccountDetails"], serde_json::json!([]));
        assert!(report.is_healthy());
    }
}
