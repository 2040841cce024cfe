use crate::context::with_service;
use crate::output::{or_dash, print_json, print_table};
use anyhow::Result;
use stackset_core::config::Config;

pub fn run(config: &Config, json: bool) -> Result<()> {
    let accounts = with_service(config, |service| async move {
        anyhow::Ok(service.organization_accounts_by_name().await?)
    })?;

    if json {
        return print_json(&accounts);
    }

    let rows = accounts
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.name.clone(),
                a.status
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into()),
                or_dash(a.email.as_deref()),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "STATUS", "EMAIL"], rows);
    Ok(())
}
