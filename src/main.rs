//! Oceangrid - ocean current grid tooling.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use oceangrid::config::{
    ProcessOptions, RunLayout, DEFAULT_DATA_DIR, DEFAULT_INPUT_FILE, DEFAULT_STRIDE, RUN_STRIDE,
};
use oceangrid::currents;
use oceangrid::fetch::{Preset, SubsetRequest};
use oceangrid::report;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "oceangrid")]
#[command(about = "Fetch, inspect and down-sample ocean current grids", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Write logs to the specified file instead of stdout
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the default grid file, then process it into the web data tree
    Run {
        /// Directory holding the grid file
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        dir: PathBuf,

        /// Grid file name inside the directory
        #[arg(long, default_value = DEFAULT_INPUT_FILE)]
        input: String,

        /// Keep every N-th row and column
        #[arg(long, default_value_t = RUN_STRIDE, value_parser = parse_stride)]
        stride: usize,
    },

    /// Print the structure of a netCDF file
    Analyze {
        /// Path to the netCDF file
        file: PathBuf,
    },

    /// Down-sample current vectors into a JSON point list
    Process {
        /// Path to the netCDF file
        file: PathBuf,

        /// Output JSON path (default: <input stem>_processed.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep every N-th row and column
        #[arg(long, default_value_t = DEFAULT_STRIDE, value_parser = parse_stride)]
        stride: usize,

        /// Time step to extract
        #[arg(long, default_value_t = 0)]
        time_index: usize,

        /// Depth layer to extract (0 is typically the surface)
        #[arg(long, default_value_t = 0)]
        depth_index: usize,
    },

    /// Download a dataset subset with the Copernicus Marine toolbox
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// Dataset selection to start from
    #[arg(long, value_enum, default_value_t = PresetArg::Currents)]
    preset: PresetArg,

    /// Destination netCDF file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the dataset identifier
    #[arg(long)]
    dataset_id: Option<String>,

    /// Override the dataset version
    #[arg(long)]
    dataset_version: Option<String>,

    /// Variables to download (repeatable)
    #[arg(long = "variable")]
    variables: Vec<String>,

    /// Western bound in degrees east
    #[arg(long, allow_hyphen_values = true)]
    min_lon: Option<f64>,
    /// Eastern bound in degrees east
    #[arg(long, allow_hyphen_values = true)]
    max_lon: Option<f64>,
    /// Southern bound in degrees north
    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<f64>,
    /// Northern bound in degrees north
    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<f64>,

    /// First timestamp (YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    start: Option<String>,

    /// Last timestamp (YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    end: Option<String>,

    /// Shallowest depth in metres
    #[arg(long)]
    min_depth: Option<f64>,
    /// Deepest depth in metres
    #[arg(long)]
    max_depth: Option<f64>,

    /// Print the command without running it
    #[arg(long)]
    dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    Currents,
    Temperature,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Currents => Preset::Currents,
            PresetArg::Temperature => Preset::Temperature,
        }
    }
}

fn parse_stride(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("stride must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    match args.command {
        Command::Run { dir, input, stride } => run(&RunLayout::new(&dir, &input), stride),
        Command::Analyze { file } => {
            analyze(&file);
            Ok(())
        }
        Command::Process {
            file,
            output,
            stride,
            time_index,
            depth_index,
        } => {
            let options = ProcessOptions {
                stride,
                time_index,
                depth_index,
            };
            currents::process(&file, output.as_deref(), &options);
            Ok(())
        }
        Command::Fetch(fetch) => fetch_subset(fetch),
    }
}

fn init_logging(log_path: Option<&Path>) -> Result<()> {
    // Set up logging to a file if --log option is provided
    if let Some(log_path) = log_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Oceangrid");
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn analyze(file: &Path) {
    if !file.exists() {
        error!("Error: File not found: {}", file.display());
        return;
    }
    match report::analyze_file(file) {
        Ok(text) => print!("{}", text),
        Err(e) => error!("Error analyzing NetCDF file: {}", e),
    }
}

fn run(layout: &RunLayout, stride: usize) -> Result<()> {
    if !layout.input.exists() {
        error!("ERROR: NetCDF file not found: {}", layout.input.display());
        error!("Please ensure the file exists in the correct location.");
        std::process::exit(1);
    }

    info!("Step 1: Analyzing NetCDF file structure...");
    match report::analyze_file(&layout.input) {
        Ok(text) => print!("{}", text),
        Err(e) => error!("Error during analysis: {}", e),
    }

    info!("Step 2: Processing ocean currents data...");
    if let Some(parent) = layout.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let options = ProcessOptions::with_stride(stride);
    if let Err(e) = currents::try_process(&layout.input, Some(&layout.output), &options) {
        currents::log_failure(&e);
    }

    info!("Done!");
    Ok(())
}

fn fetch_subset(args: FetchArgs) -> Result<()> {
    let preset = Preset::from(args.preset);
    let mut request = SubsetRequest::preset(preset);

    if let Some(id) = args.dataset_id {
        request.dataset_id = id;
    }
    if let Some(version) = args.dataset_version {
        request.dataset_version = Some(version);
    }
    if !args.variables.is_empty() {
        request.variables = args.variables;
    }
    if let Some(v) = args.min_lon {
        request.minimum_longitude = v;
    }
    if let Some(v) = args.max_lon {
        request.maximum_longitude = v;
    }
    if let Some(v) = args.min_lat {
        request.minimum_latitude = v;
    }
    if let Some(v) = args.max_lat {
        request.maximum_latitude = v;
    }
    if let Some(start) = args.start {
        request.start_datetime = start;
    }
    if let Some(end) = args.end {
        request.end_datetime = end;
    }
    if let Some(v) = args.min_depth {
        request.minimum_depth = v;
    }
    if let Some(v) = args.max_depth {
        request.maximum_depth = v;
    }
    request.output = Some(args.output.unwrap_or_else(|| preset.default_output()));

    request.validate()?;
    if args.dry_run {
        println!("{}", request);
        return Ok(());
    }

    info!("Fetching {} dataset", preset.name());
    request.run()?;
    Ok(())
}
