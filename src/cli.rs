use crate::{
    config::Config,
    driver::chrome::ChromeDriver,
    keywords::TermFrequency,
    level::classify_level,
    pay::scan_pay_range,
    pipeline::{select_sites, Pipeline},
    steps::StepProgram,
    store::{MemoryStore, RecordStore, SheetStore},
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "job-scout")]
#[command(about = "Replays per-site step programs in a browser and collects job postings")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./job-scout.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the step program against a live browser.
    Run {
        /// Step program JSON; defaults to global.steps_path.
        #[arg(long)]
        steps: Option<PathBuf>,
        /// Only run these sites (repeatable).
        #[arg(long)]
        site: Vec<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Dedup against an empty in-memory store; nothing is forwarded.
        #[arg(long)]
        no_store: bool,
    },
    /// Load and check the step program without launching a browser.
    Validate {
        #[arg(long)]
        steps: Option<PathBuf>,
    },
    /// Print the level a job title classifies as.
    Classify {
        #[arg(long)]
        title: String,
    },
    /// Print the pay figures found in a piece of text.
    Pay {
        #[arg(long)]
        text: String,
    },
    /// Print the effective configuration.
    Config {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref());
    let cfg = match &cfg_path {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
    if let Some(p) = &cfg_path {
        info!("config {}", p.display());
    }

    match &args.cmd {
        Command::Run {
            steps,
            site,
            out_dir,
            no_store,
        } => run(cfg, steps.as_deref(), site, out_dir.as_deref(), *no_store),
        Command::Validate { steps } => validate(&cfg, steps.as_deref()),
        Command::Classify { title } => {
            println!("{}", classify_level(title));
            Ok(())
        }
        Command::Pay { text } => {
            println!("{}", serde_json::to_string_pretty(&scan_pay_range(text))?);
            Ok(())
        }
        Command::Config {} => {
            print!("{}", toml::to_string(&cfg)?);
            Ok(())
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("job-scout.toml");
    default.exists().then_some(default)
}

fn init_logging(
    args: &Args,
    cfg: &Config,
    file_path: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn load_program(cfg: &Config, steps: Option<&Path>) -> Result<StepProgram> {
    let path = steps
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.global.steps_path));
    StepProgram::load(&path)
}

fn run(
    mut cfg: Config,
    steps: Option<&Path>,
    sites: &[String],
    out_override: Option<&Path>,
    no_store: bool,
) -> Result<()> {
    let program = load_program(&cfg, steps)?;
    if !sites.is_empty() {
        cfg.global.sites = sites.to_vec();
    }
    // Unknown site names are a startup error, before any browser work.
    select_sites(&program, &cfg.global.sites)?;

    let out_dir = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));
    ensure_dir(&out_dir)?;

    let mut store: Box<dyn RecordStore> = if no_store || !cfg.store.enabled {
        Box::new(MemoryStore::new())
    } else {
        Box::new(SheetStore::open(Path::new(&cfg.store.path))?)
    };

    let mut browser = ChromeDriver::launch(&cfg)?;
    let pipeline = Pipeline::new(&cfg, TermFrequency);
    let reports = pipeline.run(&mut browser, store.as_mut(), &program, &out_dir)?;

    if cfg.global.print_summary {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn validate(cfg: &Config, steps: Option<&Path>) -> Result<()> {
    let program = load_program(cfg, steps)?;
    let summary: Vec<_> = program
        .sites
        .iter()
        .map(|s| {
            serde_json::json!({
                "site": s.name,
                "steps": s.steps.iter().map(|st| st.name()).collect::<Vec<_>>(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(PathBuf::from(&cfg.output.out_dir).join("job-scout.log"))
}
