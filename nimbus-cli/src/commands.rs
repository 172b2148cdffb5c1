//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use nimbus_core::tracing_setup::{CliLogLevel, init_tracing};
use nimbus_core::{MountPlan, NimbusConfig};
use nimbus_web::{route_table, run_server};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Console log level
        #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
        log_level: CliLogLevel,
        /// Extension alias to skip; repeatable
        #[arg(long = "disable", value_name = "ALIAS")]
        disable: Vec<String>,
    },
    /// List the extensions that would be loaded
    Extensions,
    /// Print the mounted route table
    Routes,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the registry, tracing or server error of the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Server {
            host,
            port,
            log_level,
            disable,
        } => {
            let mut config = NimbusConfig::from_env();
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            for alias in disable {
                config.extensions.disable(alias);
            }
            start_server(config, log_level).await
        }
        Commands::Extensions => list_extensions(&NimbusConfig::from_env()),
        Commands::Routes => list_routes(&NimbusConfig::from_env()),
    }
}

fn mount(config: &NimbusConfig) -> anyhow::Result<MountPlan> {
    MountPlan::from_extensions(&config.extensions, &nimbus_contrib::all_extensions())
        .context("failed to mount extensions")
}

async fn start_server(config: NimbusConfig, log_level: CliLogLevel) -> anyhow::Result<()> {
    init_tracing(log_level.as_tracing_level(), None).context("failed to initialize tracing")?;

    let plan = mount(&config)?;
    for loaded in plan.extensions() {
        tracing::info!(alias = loaded.descriptor.alias, "Extension enabled");
    }
    run_server(config, plan).await?;
    Ok(())
}

fn list_extensions(config: &NimbusConfig) -> anyhow::Result<()> {
    let plan = mount(config)?;
    if plan.extensions().is_empty() {
        println!("No extensions loaded");
        return Ok(());
    }

    for loaded in plan.extensions() {
        let descriptor = &loaded.descriptor;
        println!("{} ({})", descriptor.alias, descriptor.name);
        println!("  updated:   {}", loaded.updated.to_rfc3339());
        println!("  namespace: {}", descriptor.namespace);
    }
    Ok(())
}

fn list_routes(config: &NimbusConfig) -> anyhow::Result<()> {
    let plan = mount(config)?;
    for route in route_table(&plan, &config.server.api_prefix) {
        println!("{:<7} {:<80} {}", route.method.as_str(), route.path, route.operation);
    }
    Ok(())
}
