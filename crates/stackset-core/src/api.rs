//! Seams between the dashboard and the two cloud APIs it drives.
//!
//! Everything above this module talks to `dyn CloudFormationApi` and
//! `dyn OrganizationsApi`; [`crate::aws`] backs them with the AWS SDK and
//! `crate::fake` with in-memory state for tests.

use crate::error::Result;
use crate::model::{
    OrganizationAccount, OrganizationRoot, StackInstance, StackSetDetail, StackSetSummary,
};
use crate::paginate::Page;
use async_trait::async_trait;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DeploymentTargets
// ---------------------------------------------------------------------------

/// How `Accounts` combine with `OrganizationalUnitIds`. Only intersection is
/// ever sent: every target is an account inside a known OU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountFilterType {
    Intersection,
}

impl AccountFilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountFilterType::Intersection => "INTERSECTION",
        }
    }
}

/// Which accounts a create/update/delete of stack instances applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentTargets {
    pub accounts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub organizational_unit_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_filter_type: Option<AccountFilterType>,
}

impl DeploymentTargets {
    /// Target exactly `accounts`. With an OU id the accounts are intersected
    /// with that OU, which service-managed stack sets require; without one the
    /// accounts are targeted directly.
    pub fn accounts_in(accounts: Vec<String>, organizational_unit_id: Option<&str>) -> Self {
        match organizational_unit_id {
            Some(ou) => Self {
                accounts,
                organizational_unit_ids: vec![ou.to_string()],
                account_filter_type: Some(AccountFilterType::Intersection),
            },
            None => Self {
                accounts,
                organizational_unit_ids: Vec::new(),
                account_filter_type: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CloudFormationApi: Send + Sync {
    /// One page of ACTIVE stack sets.
    async fn list_stack_sets(&self, next_token: Option<String>) -> Result<Page<StackSetSummary>>;

    async fn describe_stack_set(&self, stack_set_name: &str) -> Result<StackSetDetail>;

    async fn list_stack_instances(
        &self,
        stack_set_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackInstance>>;

    /// Returns the operation id when the API reports one.
    async fn create_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>>;

    async fn update_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>>;

    async fn delete_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
        retain_stacks: bool,
    ) -> Result<Option<String>>;
}

#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    async fn list_accounts(&self, next_token: Option<String>) -> Result<Page<OrganizationAccount>>;

    async fn list_roots(&self) -> Result<Vec<OrganizationRoot>>;

    async fn describe_account(&self, account_id: &str) -> Result<OrganizationAccount>;
}
