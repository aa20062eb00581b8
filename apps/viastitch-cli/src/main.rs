use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use viastitch_core::{stitch, StitchReport};
use viastitch_io::{load_board, load_config, save_board, StitchConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fill a board outline with a grid of ground vias", long_about = None)]
struct Args {
    /// Board snapshot (JSON) to stitch
    board: PathBuf,

    /// Stitch configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the stitched board; defaults to overwriting BOARD
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Net to assign the vias to
    #[arg(long)]
    net: Option<String>,

    /// Grid spacing in millimetres
    #[arg(long)]
    step_mm: Option<f64>,

    /// Skip grid points too close to existing pads, tracks and vias
    #[arg(long)]
    check_clearance: bool,

    /// Also place vias on the right and top board edges
    #[arg(long)]
    inclusive: bool,

    /// Report what would be placed without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn stitch_config(&self) -> Result<StitchConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => StitchConfig::default(),
        };
        if let Some(net) = &self.net {
            config.net_name = net.clone();
        }
        if let Some(step) = self.step_mm {
            config.grid_step_mm = step;
        }
        config.check_clearance |= self.check_clearance;
        config.inclusive_bounds |= self.inclusive;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<StitchReport> {
    let settings = args
        .stitch_config()?
        .to_settings()
        .context("Invalid stitch configuration")?;
    let mut board = load_board(&args.board)?;

    let report = if args.dry_run {
        let plan = viastitch_core::stitch::plan(&board, &settings)?;
        info!("Dry run: {} vias would be placed", plan.report.placed);
        plan.report
    } else {
        let report = stitch(&mut board, &settings)
            .with_context(|| format!("Stitching {} failed", args.board.display()))?;
        let output = args.output.as_ref().unwrap_or(&args.board);
        save_board(output, &board)?;
        report
    };

    info!(
        "{} of {} grid points used, {} skipped",
        report.placed,
        report.candidates,
        report.skipped()
    );
    Ok(report)
}

fn report_json(report: &StitchReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize the report")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let report = run(&args)?;
    if args.json {
        println!("{}", report_json(&report)?);
    }
    Ok(())
}
