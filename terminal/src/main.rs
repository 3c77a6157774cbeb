use anyhow::Context;
use bridge::app;
use clap::Parser;
use generator::profile::{sample_pricebook, GeneratorConfig};
use log::{info, warn};
use poscore::pos::Pricebook;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{ConfigOverrides, TerminalConfig};
use workflow::pricebook_file::load_pricebook;
use workflow::register::Register;
use workflow::runner::Runner;

mod bridge;
mod feedback;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Register terminal with camera barcode scanning")]
struct Args {
    /// Load terminal settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pricebook rows as a JSON array
    #[arg(long)]
    pricebook: Option<PathBuf>,
    /// Run the synthetic camera through a register once and print a summary
    #[arg(long, default_value_t = false)]
    demo: bool,
    /// Append the demo summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Serve the register over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[arg(long)]
    cooldown_ms: Option<u64>,
    #[arg(long)]
    buffer_capacity: Option<usize>,
    #[arg(long)]
    tax_rate: Option<f64>,
    /// Seed for the synthetic camera
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => TerminalConfig::load(path)?,
        None => TerminalConfig::default(),
    };
    let config = base.with_overrides(ConfigOverrides {
        cooldown_ms: args.cooldown_ms,
        buffer_capacity: args.buffer_capacity,
        tax_rate: args.tax_rate,
        bind_address: args.bind,
        pricebook: args.pricebook.clone(),
    });
    config.validate()?;

    let pricebook = match &config.pricebook {
        Some(path) => load_pricebook(path)?,
        None if args.demo => sample_pricebook(),
        None => Pricebook::new(),
    };
    info!("pricebook ready with {} items", pricebook.len());

    if args.demo {
        run_demo(&config, &pricebook, args.seed, args.report.as_ref())?;
    }
    if args.serve {
        serve(&config, pricebook)?;
    }
    if !args.demo && !args.serve {
        warn!("nothing to do; pass --demo or --serve");
    }

    Ok(())
}

fn run_demo(
    config: &TerminalConfig,
    pricebook: &Pricebook,
    seed: u64,
    report: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let generator = GeneratorConfig {
        barcodes: pricebook
            .items()
            .into_iter()
            .map(|product| product.barcode)
            .collect(),
        seed,
        ..Default::default()
    };
    let result = Runner::new(config.clone()).execute(pricebook, &generator)?;

    println!(
        "Demo run -> frames {} (dropped {}), accepted {}, added {}, not found {}, total {}",
        result.frames,
        result.dropped,
        result.accepted.len(),
        result.added,
        result.not_found.len(),
        result.totals.total
    );

    if let Some(path) = report {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let line = serde_json::to_string(&result).context("serializing demo summary")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening report {}", path.display()))?;
        writeln!(file, "{}", line).context("writing demo summary")?;
    }
    Ok(())
}

fn serve(config: &TerminalConfig, pricebook: Pricebook) -> anyhow::Result<()> {
    let register = Arc::new(Mutex::new(Register::new(config).with_pricebook(pricebook)));
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating HTTP runtime")?;

    runtime.block_on(async {
        let (addr, server) = warp::serve(app(register))
            .try_bind_with_graceful_shutdown(config.bind_address, async {
                if let Err(err) = signal::ctrl_c().await {
                    warn!("failed to listen for Ctrl+C: {}", err);
                }
            })
            .with_context(|| format!("binding {}", config.bind_address))?;
        info!("register listening on http://{} (Ctrl+C to stop)", addr);
        server.await;
        info!("register shut down");
        Ok::<(), anyhow::Error>(())
    })
}
