//! AWS SDK implementations of the API traits.

use crate::api::{CloudFormationApi, DeploymentTargets, OrganizationsApi};
use crate::error::{Result, StacksetError};
use crate::model::{
    AutoDeployment, OrganizationAccount, OrganizationRoot, StackInstance, StackSetDetail,
    StackSetSummary,
};
use crate::paginate::Page;
use crate::types::{AccountStatus, CallAs, DetailedStatus, DriftStatus, InstanceStatus};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation as cfn;
use aws_sdk_cloudformation::error::{DisplayErrorContext, SdkError};
use aws_sdk_organizations as orgs;

/// Load shared SDK configuration from the standard provider chain. An explicit
/// region wins over `AWS_REGION` / profile resolution.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();
    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}

fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> StacksetError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    StacksetError::aws(operation, DisplayErrorContext(&err).to_string())
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(str::to_string)
}

// ---------------------------------------------------------------------------
// CloudFormation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AwsCloudFormation {
    client: cfn::Client,
    call_as: cfn::types::CallAs,
}

impl AwsCloudFormation {
    pub fn new(client: cfn::Client, call_as: CallAs) -> Self {
        Self {
            client,
            call_as: cfn::types::CallAs::from(call_as.as_str()),
        }
    }

    pub fn from_sdk_config(config: &SdkConfig, call_as: CallAs) -> Self {
        Self::new(cfn::Client::new(config), call_as)
    }
}

fn sdk_targets(targets: DeploymentTargets) -> cfn::types::DeploymentTargets {
    let ous = (!targets.organizational_unit_ids.is_empty())
        .then_some(targets.organizational_unit_ids);
    cfn::types::DeploymentTargets::builder()
        .set_accounts(Some(targets.accounts))
        .set_organizational_unit_ids(ous)
        .set_account_filter_type(
            targets
                .account_filter_type
                .map(|f| cfn::types::AccountFilterType::from(f.as_str())),
        )
        .build()
}

fn instance_from_sdk(s: &cfn::types::StackInstanceSummary) -> StackInstance {
    StackInstance {
        account: s.account().unwrap_or_default().to_string(),
        region: s.region().unwrap_or_default().to_string(),
        organizational_unit_id: owned(s.organizational_unit_id()),
        drift_status: s
            .drift_status()
            .map(|d| DriftStatus::from(d.as_str()))
            .unwrap_or(DriftStatus::NotChecked),
        detailed_status: s
            .stack_instance_status()
            .and_then(|st| st.detailed_status())
            .map(|d| DetailedStatus::from(d.as_str())),
        status: s.status().map(|st| InstanceStatus::from(st.as_str())),
        status_reason: owned(s.status_reason()),
    }
}

#[async_trait]
impl CloudFormationApi for AwsCloudFormation {
    async fn list_stack_sets(&self, next_token: Option<String>) -> Result<Page<StackSetSummary>> {
        let out = self
            .client
            .list_stack_sets()
            .status(cfn::types::StackSetStatus::Active)
            .call_as(self.call_as.clone())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| sdk_error("ListStackSets", e))?;

        let items = out
            .summaries()
            .iter()
            .filter_map(|s| {
                Some(StackSetSummary {
                    stack_set_name: s.stack_set_name()?.to_string(),
                    stack_set_id: owned(s.stack_set_id()),
                    status: s.status().map(|st| st.as_str().to_string()),
                    permission_model: s.permission_model().map(|p| p.as_str().to_string()),
                })
            })
            .collect();
        Ok(Page::new(items, owned(out.next_token())))
    }

    async fn describe_stack_set(&self, stack_set_name: &str) -> Result<StackSetDetail> {
        let out = self
            .client
            .describe_stack_set()
            .stack_set_name(stack_set_name)
            .call_as(self.call_as.clone())
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .is_some_and(|se| se.is_stack_set_not_found_exception());
                if missing {
                    StacksetError::StackSetNotFound(stack_set_name.to_string())
                } else {
                    sdk_error("DescribeStackSet", e)
                }
            })?;

        let stack_set = out
            .stack_set()
            .ok_or_else(|| StacksetError::StackSetNotFound(stack_set_name.to_string()))?;
        let auto_deployment = stack_set
            .auto_deployment()
            .map(|a| AutoDeployment {
                enabled: a.enabled(),
                retain_stacks_on_account_removal: a.retain_stacks_on_account_removal(),
            })
            .unwrap_or_default();

        Ok(StackSetDetail {
            stack_set_name: stack_set
                .stack_set_name()
                .unwrap_or(stack_set_name)
                .to_string(),
            stack_set_id: owned(stack_set.stack_set_id()),
            description: owned(stack_set.description()),
            status: stack_set.status().map(|s| s.as_str().to_string()),
            permission_model: stack_set.permission_model().map(|p| p.as_str().to_string()),
            auto_deployment,
        })
    }

    async fn list_stack_instances(
        &self,
        stack_set_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackInstance>> {
        let out = self
            .client
            .list_stack_instances()
            .stack_set_name(stack_set_name)
            .call_as(self.call_as.clone())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .is_some_and(|se| se.is_stack_set_not_found_exception());
                if missing {
                    StacksetError::StackSetNotFound(stack_set_name.to_string())
                } else {
                    sdk_error("ListStackInstances", e)
                }
            })?;

        let items = out.summaries().iter().map(instance_from_sdk).collect();
        Ok(Page::new(items, owned(out.next_token())))
    }

    async fn create_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>> {
        let out = self
            .client
            .create_stack_instances()
            .stack_set_name(stack_set_name)
            .deployment_targets(sdk_targets(targets))
            .set_regions(Some(regions))
            .call_as(self.call_as.clone())
            .send()
            .await
            .map_err(|e| sdk_error("CreateStackInstances", e))?;
        Ok(owned(out.operation_id()))
    }

    async fn update_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
    ) -> Result<Option<String>> {
        let out = self
            .client
            .update_stack_instances()
            .stack_set_name(stack_set_name)
            .deployment_targets(sdk_targets(targets))
            .set_regions(Some(regions))
            .call_as(self.call_as.clone())
            .send()
            .await
            .map_err(|e| sdk_error("UpdateStackInstances", e))?;
        Ok(owned(out.operation_id()))
    }

    async fn delete_stack_instances(
        &self,
        stack_set_name: &str,
        targets: DeploymentTargets,
        regions: Vec<String>,
        retain_stacks: bool,
    ) -> Result<Option<String>> {
        let out = self
            .client
            .delete_stack_instances()
            .stack_set_name(stack_set_name)
            .deployment_targets(sdk_targets(targets))
            .set_regions(Some(regions))
            .retain_stacks(retain_stacks)
            .call_as(self.call_as.clone())
            .send()
            .await
            .map_err(|e| sdk_error("DeleteStackInstances", e))?;
        Ok(owned(out.operation_id()))
    }
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AwsOrganizations {
    client: orgs::Client,
}

impl AwsOrganizations {
    pub fn new(client: orgs::Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(orgs::Client::new(config))
    }
}

fn account_from_sdk(a: &orgs::types::Account) -> OrganizationAccount {
    OrganizationAccount {
        id: a.id().unwrap_or_default().to_string(),
        name: a.name().unwrap_or_default().to_string(),
        arn: owned(a.arn()),
        email: owned(a.email()),
        status: a.status().map(|s| AccountStatus::from(s.as_str())),
        joined_method: a.joined_method().map(|m| m.as_str().to_string()),
        joined_timestamp: a
            .joined_timestamp()
            .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
    }
}

#[async_trait]
impl OrganizationsApi for AwsOrganizations {
    async fn list_accounts(&self, next_token: Option<String>) -> Result<Page<OrganizationAccount>> {
        let out = self
            .client
            .list_accounts()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| sdk_error("ListAccounts", e))?;

        let items = out.accounts().iter().map(account_from_sdk).collect();
        Ok(Page::new(items, owned(out.next_token())))
    }

    async fn list_roots(&self) -> Result<Vec<OrganizationRoot>> {
        let out = self
            .client
            .list_roots()
            .send()
            .await
            .map_err(|e| sdk_error("ListRoots", e))?;

        Ok(out
            .roots()
            .iter()
            .filter_map(|r| {
                Some(OrganizationRoot {
                    id: r.id()?.to_string(),
                    arn: owned(r.arn()),
                    name: owned(r.name()),
                })
            })
            .collect())
    }

    async fn describe_account(&self, account_id: &str) -> Result<OrganizationAccount> {
        let out = self
            .client
            .describe_account()
            .account_id(account_id)
            .send()
            .await
            .map_err(|e| sdk_error("DescribeAccount", e))?;

        out.account()
            .map(account_from_sdk)
            .ok_or_else(|| {
                StacksetError::aws("DescribeAccount", format!("no account returned for {account_id}"))
            })
    }
}
