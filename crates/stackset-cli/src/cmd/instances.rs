use crate::context::with_service;
use crate::output::{or_dash, print_json, print_table};
use anyhow::Result;
use stackset_core::config::Config;
use stackset_core::model::InstanceRef;
use stackset_core::selection::ignore_set;
use stackset_core::types::InstanceStatusFilter;

pub fn run(
    config: &Config,
    stack_set: &str,
    status: InstanceStatusFilter,
    ignore: Vec<String>,
    json: bool,
) -> Result<()> {
    let ignore = ignore_set(ignore);
    let instances = with_service(config, |service| async move {
        anyhow::Ok(service.instances(stack_set, status, &ignore).await?)
    })?;

    if json {
        return print_json(&instances);
    }

    if instances.is_empty() {
        println!("No {} instances found.", status.label());
        return Ok(());
    }
    print_instances(&instances);
    Ok(())
}

pub fn print_instances(instances: &[InstanceRef]) {
    let rows = instances
        .iter()
        .map(|i| {
            let mut row = vec![
                i.account.clone(),
                i.region.clone(),
                or_dash(i.organizational_unit_id.as_deref()),
            ];
            if let Some(status) = &i.status {
                row.push(status.to_string());
            }
            row
        })
        .collect();
    let with_status = instances.iter().any(|i| i.status.is_some());
    let headers: &[&str] = if with_status {
        &["ACCOUNT", "REGION", "OU", "STATUS"]
    } else {
        &["ACCOUNT", "REGION", "OU"]
    };
    print_table(headers, rows);
}
