use crate::context::with_service;
use crate::output::{print_json, print_table};
use anyhow::Result;
use stackset_core::config::Config;
use stackset_core::model::AutoDeployment;

fn auto_deploy_cell(auto: &AutoDeployment) -> String {
    match auto.enabled {
        Some(true) => "on".into(),
        Some(false) => "off".into(),
        None => "-".into(),
    }
}

pub fn run(config: &Config, json: bool) -> Result<()> {
    let report = with_service(config, |service| async move {
        anyhow::Ok(service.dashboard().await?)
    })?;

    if json {
        return print_json(&report);
    }

    if report.stack_sets.is_empty() {
        println!("No active stack sets.");
        return Ok(());
    }

    let rows = report
        .stack_sets
        .iter()
        .map(|s| {
            vec![
                s.stack_set_name.clone(),
                auto_deploy_cell(&s.auto_deployment),
                s.total_instances.to_string(),
                s.in_sync.to_string(),
                s.drifted.to_string(),
                s.succeeded.to_string(),
                s.failed.to_string(),
                s.skipped_suspended_account.to_string(),
                s.not_deployed_accounts.to_string(),
            ]
        })
        .collect();
    print_table(
        &[
            "STACK SET",
            "AUTO",
            "TOTAL",
            "IN SYNC",
            "DRIFTED",
            "SUCCEEDED",
            "FAILED",
            "SKIPPED",
            "NOT DEPLOYED",
        ],
        rows,
    );

    let unhealthy = report.stack_sets.iter().filter(|s| !s.is_healthy()).count();
    println!();
    println!(
        "{} stack sets, {} organization accounts, {unhealthy} need attention",
        report.stack_sets.len(),
        report.total_organization_accounts,
    );
    Ok(())
}
