use crate::error::StacksetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a string-valued API enum. Values the API reports that this build
/// does not know about land in `Other` instead of failing the whole listing.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::from(s.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Upstream status values
// ---------------------------------------------------------------------------

api_enum! {
    /// Drift status of a single stack instance.
    pub enum DriftStatus {
        InSync => "IN_SYNC",
        Drifted => "DRIFTED",
        NotChecked => "NOT_CHECKED",
        Unknown => "UNKNOWN",
    }
}

api_enum! {
    /// Detailed deployment status (`StackInstanceStatus.DetailedStatus`).
    pub enum DetailedStatus {
        Pending => "PENDING",
        Running => "RUNNING",
        Succeeded => "SUCCEEDED",
        Failed => "FAILED",
        Cancelled => "CANCELLED",
        Inoperable => "INOPERABLE",
        SkippedSuspendedAccount => "SKIPPED_SUSPENDED_ACCOUNT",
        FailedImport => "FAILED_IMPORT",
    }
}

api_enum! {
    pub enum InstanceStatus {
        Current => "CURRENT",
        Outdated => "OUTDATED",
        Inoperable => "INOPERABLE",
    }
}

api_enum! {
    /// Lifecycle status of an organization member account. `Deleted` is not an
    /// API value: it marks accounts that can no longer be described.
    pub enum AccountStatus {
        Active => "ACTIVE",
        Suspended => "SUSPENDED",
        PendingClosure => "PENDING_CLOSURE",
        Deleted => "Deleted",
    }
}

// ---------------------------------------------------------------------------
// CallAs
// ---------------------------------------------------------------------------

/// Identity CloudFormation calls are made as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallAs {
    #[default]
    #[serde(rename = "DELEGATED_ADMIN")]
    DelegatedAdmin,
    #[serde(rename = "SELF")]
    SelfAccount,
}

impl CallAs {
    pub fn as_str(self) -> &'static str {
        match self {
            CallAs::DelegatedAdmin => "DELEGATED_ADMIN",
            CallAs::SelfAccount => "SELF",
        }
    }
}

impl fmt::Display for CallAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallAs {
    type Err = StacksetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "DELEGATED_ADMIN" => Ok(CallAs::DelegatedAdmin),
            "SELF" => Ok(CallAs::SelfAccount),
            _ => Err(StacksetError::InvalidCallAs(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// InstanceStatusFilter
// ---------------------------------------------------------------------------

/// The five instance health buckets the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceStatusFilter {
    InSync,
    Drifted,
    Succeeded,
    Failed,
    SkippedSuspendedAccount,
}

impl InstanceStatusFilter {
    pub fn all() -> &'static [InstanceStatusFilter] {
        &[
            InstanceStatusFilter::InSync,
            InstanceStatusFilter::Drifted,
            InstanceStatusFilter::Succeeded,
            InstanceStatusFilter::Failed,
            InstanceStatusFilter::SkippedSuspendedAccount,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceStatusFilter::InSync => "in-sync",
            InstanceStatusFilter::Drifted => "drifted",
            InstanceStatusFilter::Succeeded => "succeeded",
            InstanceStatusFilter::Failed => "failed",
            InstanceStatusFilter::SkippedSuspendedAccount => "skipped-suspended-account",
        }
    }

    /// Human wording used in "No ... instances found." messages.
    pub fn label(self) -> &'static str {
        match self {
            InstanceStatusFilter::InSync => "in sync",
            InstanceStatusFilter::Drifted => "drifted",
            InstanceStatusFilter::Succeeded => "succeeded",
            InstanceStatusFilter::Failed => "failed",
            InstanceStatusFilter::SkippedSuspendedAccount => "skipped/suspended account",
        }
    }
}

impl fmt::Display for InstanceStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InstanceStatusFilter {
    type Err = StacksetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "in-sync" => Ok(InstanceStatusFilter::InSync),
            "drifted" => Ok(InstanceStatusFilter::Drifted),
            "succeeded" => Ok(InstanceStatusFilter::Succeeded),
            "failed" => Ok(InstanceStatusFilter::Failed),
            "skipped-suspended-account" | "skipped-suspended" => {
                Ok(InstanceStatusFilter::SkippedSuspendedAccount)
            }
            _ => Err(StacksetError::InvalidStatusFilter(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryKind {
    Failed,
    Drifted,
}

impl RetryKind {
    pub fn filter(self) -> InstanceStatusFilter {
        match self {
            RetryKind::Failed => InstanceStatusFilter::Failed,
            RetryKind::Drifted => InstanceStatusFilter::Drifted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RetryKind::Failed => "failed",
            RetryKind::Drifted => "drifted",
        }
    }
}

impl fmt::Display for RetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RetryKind {
    type Err = StacksetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "failed" => Ok(RetryKind::Failed),
            "drifted" => Ok(RetryKind::Drifted),
            _ => Err(StacksetError::InvalidRetryKind(s.to_string())),
        }
    }
}
