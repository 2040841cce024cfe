use anyhow::Context as _;
use stackset_core::aws::{load_sdk_config, AwsCloudFormation, AwsOrganizations};
use stackset_core::config::Config;
use stackset_core::types::CallAs;
use stackset_core::{Settings, StackSetService};
use std::path::Path;
use std::sync::Arc;

/// Global flags that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub call_as: Option<CallAs>,
}

/// Load the config file (or defaults) and apply command-line overrides.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Config> {
    let mut config = Config::load(path).context("failed to load config")?;
    apply(&mut config, overrides);
    Ok(config)
}

fn apply(config: &mut Config, overrides: Overrides) {
    if let Some(region) = overrides.region.filter(|r| !r.is_empty()) {
        config.region = Some(region);
    }
    if let Some(call_as) = overrides.call_as {
        config.call_as = call_as;
    }
}

/// Build a service backed by the real AWS clients. Credentials and the
/// fallback region come from the standard provider chain.
pub async fn connect(config: &Config) -> anyhow::Result<StackSetService> {
    let sdk_config = load_sdk_config(config.region.clone()).await;
    let resolved = sdk_config.region().map(|r| r.to_string());
    let settings = Settings::from_config(config, resolved)?;

    tracing::debug!(region = %settings.region, call_as = %config.call_as, "connecting");

    let service = StackSetService::new(
        Arc::new(AwsCloudFormation::from_sdk_config(&sdk_config, config.call_as)),
        Arc::new(AwsOrganizations::from_sdk_config(&sdk_config)),
        settings,
    )
    .with_cache_capacity(config.cache_capacity);
    Ok(service)
}

/// Run `f` against a connected service on a fresh runtime.
pub fn with_service<T, F, Fut>(config: &Config, f: F) -> anyhow::Result<T>
where
    F: FnOnce(StackSetService) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let service = connect(config).await?;
        f(service).await
    })
}
