use crate::context;
use anyhow::Result;
use stackset_core::config::Config;
use std::sync::Arc;

pub fn run(mut config: Config, host: Option<String>, port: Option<u16>, open: bool) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let service = Arc::new(context::connect(&config).await?);
        let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
        let actual_port = listener.local_addr()?.port();

        println!(
            "StackSet dashboard → http://localhost:{actual_port}  (region {})",
            service.settings().region
        );

        tokio::select! {
            res = stackset_server::serve_on(service, listener, open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
