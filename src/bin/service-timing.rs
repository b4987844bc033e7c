use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use service_timing::config::SourcesConfig;
use service_timing::info;
use service_timing::release_log::ServiceTimes;
use service_timing::render::histogram::HistogramChart;
use service_timing::render::timeline::TimelineChart;
use service_timing::report::write_summary;
use service_timing::samples::SampleSet;
use service_timing::utillib::logging::{set_log_level, LogLevelOpt};
use service_timing::utillib::terminal::get_terminal_width;

const PROGRAM_NAME: &str = "service-timing";
const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Built-in default file lists; overridable via `--config`.
const HIST_SOURCES: &[(&str, &str)] = &[
    ("service_runs1_.csv", "Camera Service"),
    ("service_runs2_.csv", "Red Laser Service"),
];
const GRID_SOURCES: &[(&str, &str)] = &[
    ("service_runs1_.csv", "Run 1"),
    ("service_runs2_.csv", "Run 2"),
    ("service_runs3_.csv", "Run 3"),
    ("service_runs4_.csv", "Run 4"),
];

#[derive(clap::Parser, Debug)]
#[clap(next_line_help = true)]
#[clap(term_width = get_terminal_width())]
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    /// The subcommand to run. Use `--help` after the sub-command to
    /// get a list of the allowed options there.
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct HistOpts {
    /// JSON5 config file with `sources: [{ path, label }]`, replacing
    /// the built-in file list
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Number of histogram bins per panel
    #[clap(long, default_value = "30")]
    bins: usize,

    /// Print the summary table tab-separated, without padding or ANSI
    /// styling
    #[clap(long)]
    tsv: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print version
    Version,

    /// Histograms of the camera and red laser service run times, with
    /// per-bar counts and a legend carrying the mean, plus the
    /// summary statistics table on stdout.
    Hist {
        #[clap(flatten)]
        hist_opts: HistOpts,

        /// SVG output path
        #[clap(short, long, default_value = "service_hist.svg")]
        out: PathBuf,
    },

    /// 2x2 grid of step histograms with a density overlay for the
    /// four run time files, plus the summary statistics table on
    /// stdout.
    HistGrid {
        #[clap(flatten)]
        hist_opts: HistOpts,

        /// SVG output path
        #[clap(short, long, default_value = "service_hist_grid.svg")]
        out: PathBuf,
    },

    /// Timing diagram of the `RELEASE2` events per service, extracted
    /// from a text log.
    Diagram {
        /// Release log containing lines of the form `RELEASE2:
        /// Service <id> at <sec>.<nsec>`; everything else is ignored
        #[clap(default_value = "release_times.log")]
        log: PathBuf,

        /// SVG output path, overwritten on each run
        #[clap(short, long, default_value = "service_timing.svg")]
        out: PathBuf,
    },
}

fn run_hist(
    hist_opts: HistOpts,
    out: &Path,
    chart: HistogramChart,
    default_sources: &[(&str, &str)],
) -> Result<()> {
    let HistOpts { config, bins, tsv } = hist_opts;
    let sources = SourcesConfig::load_or_default(config, default_sources)?;
    let samples = SampleSet::read_sources(&sources.sources)?;
    let chart = HistogramChart { bins, ..chart };
    chart.save(&samples, out)?;
    info!("wrote {out:?}");

    println!("\nSummary Statistics (including variance):");
    write_summary(&samples, tsv, &mut stdout().lock())?;
    Ok(())
}

fn main() -> Result<()> {
    let Opts { log_level, command } = Opts::parse();
    set_log_level(log_level.into());

    match command {
        Command::Version => println!("{PROGRAM_NAME} version {PROGRAM_VERSION}"),

        Command::Hist { hist_opts, out } => {
            run_hist(hist_opts, &out, HistogramChart::pair(), HIST_SOURCES)?
        }

        Command::HistGrid { hist_opts, out } => {
            run_hist(hist_opts, &out, HistogramChart::grid(), GRID_SOURCES)?
        }

        Command::Diagram { log, out } => {
            let times = ServiceTimes::read_log_file(&log)?;
            if times.is_empty() {
                info!("no release events found in {log:?}");
            }
            TimelineChart::new().save(&times, &out)?;
            info!("wrote {out:?}");
        }
    }

    Ok(())
}
