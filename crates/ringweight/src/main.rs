//! `ringweight`: plan and apply device weight changes on a ring.
//!
//! # Usage
//!
//! ```text
//! ringweight create object.ring --part-power 18 --replicas 3
//! ringweight add-nodes object.ring object.new.ring 2 6000 10.2.0.1 10.2.0.2
//! ringweight add-nodes in.ring out.ring 2 6000 10.2.0.3 --devices sdb1,sdc1
//! ringweight assign-partitions in.ring out.ring 2 0.01
//! ringweight show object.ring
//! ```
//!
//! Every mutating command reads one ring file and writes another; the input
//! is never modified. Pass `--dry-run` to log the plan without writing.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ringweight_engine::{NodeSet, ProvisionConfig, Provisioner, Retargeter};
use ringweight_ring::{RingBuilder, RingMutator};
use ringweight_types::{Region, Zone};
use tracing::info;

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "ringweight",
    version,
    about = "Compute and apply device weights for a partitioned storage ring"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true, env = "RINGWEIGHT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add nodes to a region, weighted for about one partition per device.
    AddNodes {
        /// Ring file to start from.
        input: PathBuf,

        /// File to write the resulting ring to.
        output: PathBuf,

        /// Region to add the nodes to.
        region: Region,

        /// Port of the storage service (e.g. 6000 objects, 6001 containers,
        /// 6002 accounts).
        port: u16,

        /// Addresses of the nodes to add.
        #[arg(value_name = "IP", required = true, num_args = 1..)]
        ips: Vec<String>,

        /// Device paths on each node, comma separated. Overrides the config.
        #[arg(long, value_delimiter = ',')]
        devices: Option<Vec<String>>,

        /// Zone for the new devices. Overrides the config.
        #[arg(long)]
        zone: Option<Zone>,

        /// Compute and log the plan without writing the output ring.
        #[arg(long)]
        dry_run: bool,
    },

    /// Reweight every device of a region so it holds a share of the ring.
    AssignPartitions {
        /// Ring file to start from.
        input: PathBuf,

        /// File to write the resulting ring to.
        output: PathBuf,

        /// Region whose devices are reweighted.
        region: Region,

        /// Share of the ring the region should hold, e.g. 0.01 for 1%.
        ratio: f64,

        /// Compute and log the plan without writing the output ring.
        #[arg(long)]
        dry_run: bool,
    },

    /// Create an empty ring file.
    Create {
        /// File to write the new ring to.
        output: PathBuf,

        /// Partition power: the ring has 2^part_power partitions.
        #[arg(long, default_value = "18")]
        part_power: u8,

        /// Number of replicas of each partition.
        #[arg(long, default_value = "3")]
        replicas: u32,
    },

    /// Show the devices and per-region weight shares of a ring.
    Show {
        /// Ring file to inspect.
        ring: PathBuf,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::AddNodes {
            input,
            output,
            region,
            port,
            ips,
            devices,
            zone,
            dry_run,
        } => {
            // CLI args override config file values.
            let mut provision = config.provision_config();
            if let Some(devices) = devices {
                provision.device_paths = devices;
            }
            if let Some(zone) = zone {
                provision.zone = zone;
            }
            let nodes = NodeSet { region, port, ips };
            cmd_add_nodes(&input, &output, provision, &nodes, dry_run)
        }
        Commands::AssignPartitions {
            input,
            output,
            region,
            ratio,
            dry_run,
        } => cmd_assign_partitions(&input, &output, region, ratio, dry_run),
        Commands::Create {
            output,
            part_power,
            replicas,
        } => cmd_create(&output, part_power, replicas),
        Commands::Show { ring } => cmd_show(&ring),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_ring(path: &Path) -> Result<RingBuilder> {
    RingBuilder::load(path).with_context(|| format!("failed to load ring {}", path.display()))
}

fn persist_ring(ring: &RingBuilder, path: &Path) -> Result<()> {
    ring.persist(path)
        .with_context(|| format!("failed to write ring {}", path.display()))?;
    info!(path = %path.display(), devices = ring.devices().len(), "wrote ring");
    Ok(())
}

// -----------------------------------------------------------------------
// ringweight add-nodes
// -----------------------------------------------------------------------

fn cmd_add_nodes(
    input: &Path,
    output: &Path,
    provision: ProvisionConfig,
    nodes: &NodeSet,
    dry_run: bool,
) -> Result<()> {
    let mut ring = load_ring(input)?;
    let provisioner = Provisioner::new(provision);

    let outcome = provisioner
        .plan(&ring.snapshot(), nodes)
        .context("cannot plan new devices")?;

    if dry_run {
        info!(
            devices = outcome.devices.len(),
            weight = outcome.plan.weight,
            "dry run, not writing {}",
            output.display()
        );
        return Ok(());
    }

    provisioner
        .apply(&mut ring, &outcome)
        .context("cannot add devices")?;
    persist_ring(&ring, output)
}

// -----------------------------------------------------------------------
// ringweight assign-partitions
// -----------------------------------------------------------------------

fn cmd_assign_partitions(
    input: &Path,
    output: &Path,
    region: Region,
    ratio: f64,
    dry_run: bool,
) -> Result<()> {
    let mut ring = load_ring(input)?;
    let retargeter = Retargeter::new();

    let plan = retargeter
        .plan(&ring.snapshot(), region, ratio)
        .context("cannot plan region weights")?;

    if dry_run {
        info!(
            devices = plan.assignments.len(),
            weight = plan.weight,
            "dry run, not writing {}",
            output.display()
        );
        return Ok(());
    }

    retargeter
        .apply(&mut ring, &plan)
        .context("cannot set device weights")?;
    persist_ring(&ring, output)
}

// -----------------------------------------------------------------------
// ringweight create
// -----------------------------------------------------------------------

fn cmd_create(output: &Path, part_power: u8, replicas: u32) -> Result<()> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    let ring = RingBuilder::new(part_power, replicas).context("invalid ring parameters")?;
    info!(part_power, replicas, "creating ring");
    persist_ring(&ring, output)
}

// -----------------------------------------------------------------------
// ringweight show
// -----------------------------------------------------------------------

fn cmd_show(path: &Path) -> Result<()> {
    let ring = load_ring(path)?;
    let snapshot = ring.snapshot();

    println!(
        "{}: {} partitions, {} replicas, {} devices, total weight {:.2}",
        path.display(),
        snapshot.partitions,
        snapshot.replicas,
        snapshot.devices.len(),
        snapshot.total_weight(),
    );

    println!("Regions:");
    for region in snapshot.regions() {
        let share = snapshot.region_share(region).unwrap_or(0.0);
        println!(
            "  region {region}: {} devices, weight {:.2}, share {:.4}%, ~{:.0} slots",
            snapshot.region_device_count(region),
            snapshot.region_weight(region),
            share * 100.0,
            share * snapshot.slots() as f64,
        );
    }

    println!("Devices:");
    for d in &snapshot.devices {
        println!(
            "  {:>5} r{} z{} {}:{}/{} weight={:.2}{}",
            d.id.get(),
            d.region,
            d.zone,
            d.ip,
            d.port,
            d.device,
            d.weight,
            if d.meta.is_empty() {
                String::new()
            } else {
                format!(" ({})", d.meta)
            },
        );
    }

    Ok(())
}
