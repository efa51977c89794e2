use std::path::PathBuf;

#[cfg(feature = "kafka")]
use anyhow::Context;
use bevy_ecs::prelude::World;
use clap::{Parser, ValueEnum};
use sim_core::poi::PoiCatalog;
use sim_core::publisher::{JsonLinesPublisher, Publisher, PublisherResource};
use sim_core::runner::{fleet_schedule, run_realtime, RunLimits};
use sim_core::scenario::build_fleet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::StreamConfig;

mod config;
#[cfg(feature = "kafka")]
mod kafka;

/// Streams simulated ride-hailing vehicle telemetry
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file (brokers, topic, vehicles per province, duration)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory holding pois_<province>.json files
    #[arg(long, default_value = "data")]
    pois_dir: PathBuf,

    /// Overrides duration_seconds from the config file
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Overrides the RNG seed from the config file
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Sink::Stdout)]
    sink: Sink,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sink {
    /// One `vehicle_id<TAB>json` line per message
    Stdout,
    /// Kafka topic from the config file (requires the `kafka` feature)
    Kafka,
}

#[cfg_attr(not(feature = "kafka"), allow(unused_variables))]
fn build_publisher(sink: Sink, config: &StreamConfig) -> anyhow::Result<Box<dyn Publisher>> {
    match sink {
        Sink::Stdout => Ok(Box::new(JsonLinesPublisher::stdout())),
        #[cfg(feature = "kafka")]
        Sink::Kafka => {
            let publisher = kafka::KafkaPublisher::new(&config.kafka_broker, &config.topic_name)
                .context("creating kafka producer")?;
            Ok(Box::new(publisher))
        }
        #[cfg(not(feature = "kafka"))]
        Sink::Kafka => anyhow::bail!("this binary was built without the `kafka` feature"),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = StreamConfig::load(&cli.config)?;
    let mut params = config.fleet_params();
    if let Some(duration_secs) = cli.duration_secs {
        params = params.with_duration_secs(duration_secs);
    }
    if let Some(seed) = cli.seed {
        params = params.with_seed(seed);
    }

    let catalog = PoiCatalog::load_dir(&cli.pois_dir)?;
    let mut world = World::new();
    build_fleet(&mut world, &params, &catalog)?;
    world.insert_resource(PublisherResource(build_publisher(cli.sink, &config)?));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            interrupt.cancel();
        }
    });

    let mut schedule = fleet_schedule();
    let summary = run_realtime(&mut world, &mut schedule, RunLimits::from(&params), cancel).await;

    info!(
        ticks = summary.ticks,
        available = summary.final_counts.available,
        in_trip = summary.final_counts.in_trip,
        paused = summary.final_counts.paused,
        out_of_service = summary.final_counts.out_of_service,
        "final fleet state"
    );
    if !summary.flushed {
        warn!("some messages may not have been delivered");
    }
    Ok(())
}
