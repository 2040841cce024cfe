use crate::cmd::instances::print_instances;
use crate::context::with_service;
use crate::output::{or_dash, print_json, print_table};
use anyhow::Result;
use stackset_core::config::Config;
use stackset_core::model::OrganizationAccount;
use stackset_core::selection::ignore_set;
use stackset_core::types::RetryKind;
use stackset_core::Remediation;

fn print_operations<T>(outcome: &Remediation<T>) {
    if let Remediation::Applied { operation_ids, .. } = outcome {
        if !operation_ids.is_empty() {
            println!();
            println!("Operations: {}", operation_ids.join(", "));
        }
    }
}

// ---------------------------------------------------------------------------
// add-undeployed
// ---------------------------------------------------------------------------

pub fn add_undeployed(
    config: &Config,
    stack_set: &str,
    dry_run: bool,
    ignore: Vec<String>,
    json: bool,
) -> Result<()> {
    let ignore = ignore_set(ignore);
    let outcome = with_service(config, |service| async move {
        anyhow::Ok(
            service
                .add_undeployed_accounts(stack_set, dry_run, &ignore)
                .await?,
        )
    })?;

    if json {
        return print_json(&outcome);
    }

    match &outcome {
        Remediation::DryRun { .. } => println!("Dry run: following accounts would be added"),
        _ if outcome.targets().is_empty() => {
            println!("Every organization account already has '{stack_set}'.");
            return Ok(());
        }
        _ => println!("Undeployed accounts added successfully."),
    }
    print_accounts(outcome.targets());
    print_operations(&outcome);
    Ok(())
}

fn print_accounts(accounts: &[OrganizationAccount]) {
    let rows = accounts
        .iter()
        .map(|a| vec![a.id.clone(), a.name.clone(), or_dash(a.email.as_deref())])
        .collect();
    print_table(&["ID", "NAME", "EMAIL"], rows);
}

// ---------------------------------------------------------------------------
// remove-suspended
// ---------------------------------------------------------------------------

pub fn remove_suspended(
    config: &Config,
    stack_set: &str,
    dry_run: bool,
    ignore: Vec<String>,
    json: bool,
) -> Result<()> {
    let ignore = ignore_set(ignore);
    let outcome = with_service(config, |service| async move {
        anyhow::Ok(
            service
                .remove_suspended_accounts(stack_set, dry_run, &ignore)
                .await?,
        )
    })?;

    if json {
        return print_json(&outcome);
    }

    match &outcome {
        Remediation::NothingFound => {
            println!("No suspended accounts found.");
            return Ok(());
        }
        Remediation::DryRun { .. } => println!("Dry run: following accounts would be removed"),
        Remediation::Applied { .. } => println!("Suspended accounts removed successfully."),
    }
    print_instances(outcome.targets());
    print_operations(&outcome);
    Ok(())
}

// ---------------------------------------------------------------------------
// retry
// ---------------------------------------------------------------------------

fn retried_message(kind: RetryKind) -> &'static str {
    match kind {
        RetryKind::Failed => "Failed instances retried successfully.",
        RetryKind::Drifted => "Drifted instances retried successfully.",
    }
}

pub fn retry(
    config: &Config,
    stack_set: &str,
    kind: RetryKind,
    dry_run: bool,
    ignore: Vec<String>,
    json: bool,
) -> Result<()> {
    let ignore = ignore_set(ignore);
    let outcome = with_service(config, |service| async move {
        anyhow::Ok(
            service
                .retry_instances(stack_set, kind, dry_run, &ignore)
                .await?,
        )
    })?;

    if json {
        return print_json(&outcome);
    }

    match &outcome {
        Remediation::NothingFound => {
            println!("No {kind} instances found.");
            return Ok(());
        }
        Remediation::DryRun { .. } => println!("Dry run: following instances would be retried"),
        Remediation::Applied { .. } => println!("{}", retried_message(kind)),
    }
    print_instances(outcome.targets());
    print_operations(&outcome);
    Ok(())
}
