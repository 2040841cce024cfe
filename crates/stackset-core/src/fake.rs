//! In-memory doubles for the cloud API traits, used by this workspace's tests.
//!
//! Listings are served in pages of `page_size` items with the offset as the
//! continuation token. Mutations are recorded rather than applied.

use crate::api::{CloudFormationApi, DeploymentTargets, OrganizationsApi};
use crate::error::{Result, StacksetError};
use crate::model::{
    AutoDeployment, OrganizationAccount, OrganizationRoot, StackInstance, StackSetDetail,
    StackSetSummary,
};
use crate::paginate::Page;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const DEFAULT_PAGE_SIZE: usize = 100;

fn page_of<T: Clone>(items: &[T], token: Option<String>, page_size: usize) -> Result<Page<T>> {
    let start = match token {
        Some(t) => t
            .parse::<usize>()
            .map_err(|_| StacksetError::aws("Paginate", format!("bad token {t}")))?,
        None => 0,
    };
    let end = (start + page_size.max(1)).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok(Page::new(items[start.min(end)..end].to_vec(), next))
}

// ---------------------------------------------------------------------------
// CloudFormation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create {
        stack_set: String,
        targets: DeploymentTargets,
        regions: Vec<String>,
    },
    Update {
        stack_set: String,
        targets: DeploymentTargets,
        regions: Vec<String>,
    },
    Delete {
        stack_set: String,
        targets: DeploymentTargets,
        regions: Vec<String>,
        retain_stacks: bool,
    },
}

#[derive(Debug)]
pub struct FakeCloudFormation {
    stack_sets: Vec<(StackSetDetail, Vec<StackInstance>)>,
    page_size: usize,
    failure: Option<String>,
    mutation_failure: Option<String>,
    mutations: Mutex<Vec<Mutation>>,
    list_instance_calls: AtomicUsize,
}

impl Default for FakeCloudFormation {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCloudFormation {
    pub fn new() -> Self {
        Self {
            stack_sets: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
            mutation_failure: None,
            mutations: Mutex::new(Vec::new()),
            list_instance_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_stack_set(
        mut self,
        name: &str,
        auto_deployment: AutoDeployment,
        instances: Vec<StackInstance>,
    ) -> Self {
        let detail = StackSetDetail {
            stack_set_name: name.to_string(),
            stack_set_id: Some(format!("{name}:00000000-0000-0000-0000-000000000000")),
            description: None,
            status: Some("ACTIVE".to_string()),
            permission_model: Some("SERVICE_MANAGED".to_string()),
            auto_deployment,
        };
        self.stack_sets.push((detail, instances));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Make every call fail with an upstream error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Serve listings normally but reject every create/update/delete. The
    /// attempt is still recorded.
    pub fn failing_mutations(mut self, message: &str) -> Self {
        self.mutation_failure = Some(message.to_string());
        self
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn list_instance_calls(&self) -> usize {
        self.list_instance_calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        match &self.failure {
            Some(message) => Err(StacksetError::aws(operation, message.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, name: &str) -> Result<&(StackSetDetail, Vec<StackInstance>)> {
        self.stack_sets
            .iter()
            .find(|(detail, _)| detail.stack_set_name == name)
            .ok_or_else(|| StacksetError::StackSetNotFound(name.to_string()))
    }

    fn record(&self, operation: &'static str, mutation: Mutation) -> Result<Option<String>> {
        let mut mutations = self.mutations.lock().unwrap_or_else(|e| e.into_inner());
        mutations.push(mutation);
        match &self.mutation_failure {
            Some(message) => Err(StacksetError::aws(operation, message.clone())),
            None => Ok(Some(format!("op-{}", mutations.len()))),
        }
    }
}

#[async_trait]
impl CloudFormationApi for FakeCloudFormation {
    async fn list_stack_sets(&self, next_token: Option<String>) -> Result<Page<StackSetSummary>> {
        self.check("ListStackSets")?;
        let summaries: Vec<StackSetSummary> = self
            .stack_sets
            .iter()
            .map(|(detail, _)| StackSetSummary {
                stack_set_name: detail.stack_set_name.clone(),
                stack_set_id: detail.stack_set_id.clone(),
                status: detail.status.clone(),
                permission_model: detail.permission_model.clone(),
            })
            .collect();
        page_of(&summaries, next_token, self.page_size)
    }

    async fn describe_stack_set(&self, stack_set_name: &str) -> Result<StackSetDetail> {
        self.check("DescribeStackSet")?;
        Ok(self.find(stack_set_name)?.0.clone())
    }

    async fn list_stack_instances(
        &self,
        stack_set_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackInstance>> {
        self.check("ListStackInstances")?;
        self.list_instance_calls.fetch_add(1, Ordering::SeqCst);
        let (_, instances) = self.find(stack_set_name)?;
        page_of(instances, next_token, self.page_size)
    }

    async fn create_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>> {
        self.check("CreateStackInstances")?;
        self.find(stack_set_name)?;
        self.record(
            "CreateStackInstances",
            Mutation::Create {
                stack_set: stack_set_name.to_string(),
                targets,
                regions,
            },
        )
    }

    async fn update_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>> {
        self.check("UpdateStackInstances")?;
        self.find(stack_set_name)?;
        self.record(
            "UpdateStackInstances",
            Mutation::Update {
                stack_set: stack_set_name.to_string(),
                targets,
                regions,
            },
        )
    }

    async fn delete_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
        retain_stacks: bool,
    ) -> Result<Option<String>> {
        self.check("DeleteStackInstances")?;
        self.find(stack_set_name)?;
        self.record(
            "DeleteStackInstances",
            Mutation::Delete {
                stack_set: stack_set_name.to_string(),
                targets,
                regions,
                retain_stacks,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FakeOrganizations {
    accounts: Vec<OrganizationAccount>,
    roots: Vec<OrganizationRoot>,
    page_size: usize,
    failure: Option<String>,
    describe_calls: AtomicUsize,
}

impl Default for FakeOrganizations {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeOrganizations {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            roots: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
            describe_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_account(mut self, account: OrganizationAccount) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_root(mut self, root: OrganizationRoot) -> Self {
        self.roots.push(root);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        match &self.failure {
            Some(message) => Err(StacksetError::aws(operation, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrganizationsApi for FakeOrganizations {
    async fn list_accounts(&self, next_token: Option<String>) -> Result<Page<OrganizationAccount>> {
        self.check("ListAccounts")?;
        page_of(&self.accounts, next_token, self.page_size)
    }

    async fn list_roots(&self) -> Result<Vec<OrganizationRoot>> {
        self.check("ListRoots")?;
        Ok(self.roots.clone())
    }

    async fn describe_account(&self, account_id: &str) -> Result<OrganizationAccount> {
        self.check("DescribeAccount")?;
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| {
                StacksetError::aws(
                    "DescribeAccount",
                    format!("AccountNotFoundException: {account_id}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_by_offset() {
        let items = vec![1, 2, 3];
        let first = page_of(&items, None, 2).unwrap();
        assert_eq!(first, Page::new(vec![1, 2], Some("2".into())));
        let second = page_of(&items, first.next_token, 2).unwrap();
        assert_eq!(second, Page::last(vec![3]));
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let items: Vec<u8> = Vec::new();
        assert_eq!(page_of(&items, None, 10).unwrap(), Page::last(vec![]));
    }
}
