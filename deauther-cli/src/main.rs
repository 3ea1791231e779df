use anyhow::{Context, Result};
use deauther_cli::{Cli, Commands};
use deauther_core::{AttackId, MonitorInterface, Protocol};
use deauther_protocols::dot11::TargetList;
use deauther_protocols::Dot11Protocol;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(!cli.no_color),
        )
        .with(filter)
        .init();

    match &cli.command {
        Commands::Interfaces => list_interfaces(),
        Commands::Protocols => list_protocols(),
        Commands::Attack { interface, .. } => {
            let params = cli
                .command
                .attack_params()
                .context("attack parameters missing")??;
            run_attack(interface, params).await
        }
    }
}

fn list_interfaces() -> Result<()> {
    let interfaces = MonitorInterface::list_all();
    if interfaces.is_empty() {
        println!("No network interfaces found");
        return Ok(());
    }

    println!("Available interfaces:");
    for iface in interfaces {
        println!("  {:<4} {}", iface.index, iface);
    }
    Ok(())
}

fn list_protocols() -> Result<()> {
    let protocols: [Box<dyn Protocol>; 1] = [Box::new(Dot11Protocol::new())];

    for proto in &protocols {
        println!("{} ({})", proto.name(), proto.shortname());
        for attack in proto.attacks() {
            println!("  [{}] {}: {}", attack.id.0, attack.name, attack.description);
            for param in attack.parameters {
                let marker = if param.required { " (required)" } else { "" };
                let default = param
                    .default
                    .map(|d| format!(" [default: {}]", d))
                    .unwrap_or_default();
                println!(
                    "      {:<12} {:<8} {}{}{}",
                    param.name, param.param_type, param.description, marker, default
                );
            }
        }
    }
    Ok(())
}

async fn run_attack(interface: &str, params: deauther_core::AttackParams) -> Result<()> {
    let iface = MonitorInterface::by_name(interface)
        .and_then(MonitorInterface::open)
        .with_context(|| format!("cannot open interface {}", interface))?;
    info!(interface = %iface, "Using interface");

    if let Some(Ok(targets)) = params.get_string("targets").map(TargetList::parse_list) {
        let channels = targets.channel_count();
        if channels > 1 {
            warn!(
                channels,
                "Targets span several channels; the interface is not retuned between them"
            );
        }
    }

    let proto = Dot11Protocol::new();
    let mut handle = proto
        .launch_attack(AttackId(0), params, Box::new(iface))
        .await
        .context("failed to launch attack")?;

    tokio::select! {
        result = handle.wait() => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping attack");
            handle.stop_and_wait().await?;
        }
    }

    let stats = handle.stats();
    info!(
        id = %handle.id,
        packets = stats.packets_sent,
        bytes = stats.bytes_sent,
        errors = stats.errors,
        "Attack finished"
    );
    Ok(())
}
