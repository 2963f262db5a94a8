mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use graph::parse::parse_reference;
use graph::render::{Charset, RowLabeler, TextRenderer};
use graph::{GitWalker, GraphController, LogBatch, LogSource, TextLogSource};
use std::path::PathBuf;
use tracing::{info, Level};

use config::Config;

#[derive(Parser)]
#[command(name = "loggraph")]
#[command(about = "Draw the commit graph of a repository or a text log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the history of a git repository
    Show {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Number of commits to load
        #[arg(short, long)]
        limit: Option<usize>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Draw a `timestamp|-hash|-parents` log file
    Text {
        /// Log file
        file: PathBuf,
        /// Reference to place on a commit; every head gets one when omitted
        #[arg(long = "ref", value_name = "NAME=HASH")]
        refs: Vec<String>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Print graph statistics for a git repository
    Stats {
        /// Path to the repository
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Number of commits to load
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug, Default)]
struct DisplayArgs {
    /// Draw long edges through every row
    #[arg(long)]
    long_edges: bool,
    /// Collapse every linear stretch of history
    #[arg(long)]
    collapse: bool,
    /// Draw with ASCII characters only
    #[arg(long)]
    ascii: bool,
    /// Disable colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Show {
            path,
            limit,
            display,
        } => {
            let batch = fetch(move || git_source(path, limit)?.load()).await?;
            print!("{}", render_batch(&batch, &config, &display)?);
        }
        Commands::Text {
            file,
            refs,
            display,
        } => {
            let refs = refs
                .iter()
                .map(|spec| parse_reference(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let source = TextLogSource::new(file).with_references(refs);
            let batch = fetch(move || source.load()).await?;
            print!("{}", render_batch(&batch, &config, &display)?);
        }
        Commands::Stats { path, limit } => {
            let batch = fetch(move || git_source(path, limit)?.load()).await?;
            print!("{}", stats_report(&batch, &config)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn git_source(path: PathBuf, limit: Option<usize>) -> Result<GitWalker> {
    let path = path
        .to_str()
        .with_context(|| format!("Repository path is not UTF-8: {}", path.display()))?
        .to_string();
    Ok(GitWalker::new(Some(&path))?.with_limit(limit))
}

/// Load history on the blocking pool so the runtime stays responsive
async fn fetch<F>(load: F) -> Result<LogBatch>
where
    F: FnOnce() -> Result<LogBatch> + Send + 'static,
{
    tokio::task::spawn_blocking(load)
        .await
        .context("History loader panicked")?
}

fn render_batch(batch: &LogBatch, config: &Config, display: &DisplayArgs) -> Result<String> {
    let mut options = config.print;
    if display.long_edges {
        options.show_long_edges = true;
    }

    let controller = GraphController::new(options);
    let stats = controller.rebuild(&batch.commits, &batch.references)?;
    info!(
        rows = stats.total_rows,
        branches = stats.total_branches,
        "graph built"
    );
    if display.collapse || config.fragments.collapse_on_load {
        controller.hide_all();
        info!(visible = controller.visible_row_count(), "fragments collapsed");
    }

    let charset = if display.ascii {
        Charset::Ascii
    } else {
        config.render.charset
    };
    let color = config.render.color && !display.no_color;

    let graph = controller.graph();
    let labeler = RowLabeler::new(&graph, batch, config.render.label_width);
    let model = controller.print();
    Ok(TextRenderer::new(charset, color).render(&model, |row| labeler.label(row.row)))
}

fn stats_report(batch: &LogBatch, config: &Config) -> Result<String> {
    let controller = GraphController::new(config.print);
    let stats = controller.rebuild(&batch.commits, &batch.references)?;

    let date = |timestamp: Option<i64>| {
        timestamp
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let timestamps = batch.timestamps();
    let oldest = timestamps.values().copied().min();
    let newest = timestamps.values().copied().max();

    let mut report = String::new();
    report.push_str(&format!("Commits:        {}\n", batch.commits.len()));
    report.push_str(&format!("References:     {}\n", batch.references.len()));
    report.push_str(&format!("Rows:           {}\n", stats.total_rows));
    report.push_str(&format!("Nodes:          {}\n", stats.total_nodes));
    report.push_str(&format!("Edges:          {}\n", stats.total_edges));
    report.push_str(&format!("Branches:       {}\n", stats.total_branches));
    report.push_str(&format!("Merge commits:  {}\n", stats.merge_commits));
    report.push_str(&format!("Head commits:   {}\n", stats.head_commits));
    report.push_str(&format!("End commits:    {}\n", stats.end_commits));
    report.push_str(&format!("Longest edge:   {} rows\n", stats.longest_edge));
    report.push_str(&format!("Oldest commit:  {}\n", date(oldest)));
    report.push_str(&format!("Newest commit:  {}\n", date(newest)));
    Ok(report)
}
