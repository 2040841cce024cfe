use crate::types::{AccountStatus, DetailedStatus, DriftStatus, InstanceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StackSet
// ---------------------------------------------------------------------------

/// Auto-deployment policy of a service-managed stack set. Both fields are
/// absent for self-managed stack sets, which serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutoDeployment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_stacks_on_account_removal: Option<bool>,
}

/// One row of `ListStackSets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSetSummary {
    pub stack_set_name: String,
    #[serde(default)]
    pub stack_set_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub permission_model: Option<String>,
}

impl StackSetSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            stack_set_name: name.into(),
            stack_set_id: None,
            status: Some("ACTIVE".to_string()),
            permission_model: None,
        }
    }
}

/// Result of `DescribeStackSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSetDetail {
    pub stack_set_name: String,
    #[serde(default)]
    pub stack_set_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub permission_model: Option<String>,
    #[serde(default)]
    pub auto_deployment: AutoDeployment,
}

// ---------------------------------------------------------------------------
// StackInstance
// ---------------------------------------------------------------------------

/// One row of `ListStackInstances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackInstance {
    pub account: String,
    pub region: String,
    #[serde(default)]
    pub organizational_unit_id: Option<String>,
    #[serde(default = "default_drift_status")]
    pub drift_status: DriftStatus,
    #[serde(default)]
    pub detailed_status: Option<DetailedStatus>,
    #[serde(default)]
    pub status: Option<InstanceStatus>,
    #[serde(default)]
    pub status_reason: Option<String>,
}

fn default_drift_status() -> DriftStatus {
    DriftStatus::NotChecked
}

impl StackInstance {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            organizational_unit_id: None,
            drift_status: DriftStatus::NotChecked,
            detailed_status: None,
            status: None,
            status_reason: None,
        }
    }

    pub fn with_ou(mut self, ou: impl Into<String>) -> Self {
        self.organizational_unit_id = Some(ou.into());
        self
    }

    pub fn with_drift(mut self, drift: DriftStatus) -> Self {
        self.drift_status = drift;
        self
    }

    pub fn with_detailed_status(mut self, status: DetailedStatus) -> Self {
        self.detailed_status = Some(status);
        self
    }

    pub fn to_ref(&self) -> InstanceRef {
        InstanceRef {
            account: self.account.clone(),
            region: self.region.clone(),
            organizational_unit_id: self.organizational_unit_id.clone(),
            status: None,
        }
    }
}

/// The `{Account, Region, OrganizationalUnitId}` projection used both in
/// listings and as a remediation target. `Status` is only filled in for
/// accounts considered for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRef {
    pub account: String,
    pub region: String,
    pub organizational_unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub joined_method: Option<String>,
    #[serde(default)]
    pub joined_timestamp: Option<DateTime<Utc>>,
}

impl OrganizationAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arn: None,
            email: None,
            status: Some(AccountStatus::Active),
            joined_method: None,
            joined_timestamp: None,
        }
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganizationRoot {
    pub id: String,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_auto_deployment_serializes_empty() {
        let json = serde_json::to_value(AutoDeployment::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn instance_ref_uses_pascal_case_keys() {
        let r = StackInstance::new("111111111111", "us-east-1")
            .with_ou("ou-abcd-1234")
            .to_ref();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Account": "111111111111",
                "Region": "us-east-1",
                "OrganizationalUnitId": "ou-abcd-1234",
            })
        );
    }

    #[test]
    fn instance_ref_includes_status_when_set() {
        let mut r = StackInstance::new("111111111111", "eu-west-1").to_ref();
        r.status = Some(AccountStatus::Deleted);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["Status"], "Deleted");
        assert!(json["OrganizationalUnitId"].is_null());
    }

    #[test]
    fn account_deserializes_from_api_shape() {
        let account: OrganizationAccount = serde_json::from_value(serde_json::json!({
            "Id": "222222222222",
            "Name": "sandbox",
            "Status": "SUSPENDED",
        }))
        .unwrap();
        assert_eq!(account.id, "222222222222");
        assert_eq!(account.status, Some(AccountStatus::Suspended));
        assert!(account.email.is_none());
    }
}
