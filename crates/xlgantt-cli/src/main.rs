//! xlgantt CLI - Gantt timelines from task workbooks
//!
//! Command-line interface for rendering, inspecting and scaffolding plans.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xlgantt_core::{Config, FilterSet, TaskField, Timeline};
use xlgantt_render::{TemplateWriter, VisTimelineRenderer};
use xlgantt_viewer::{GanttViewer, Source};

#[derive(Parser)]
#[command(name = "xlgantt")]
#[command(author, version, about = "Gantt timelines from task workbooks", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./xlgantt.toml when present)
    #[arg(long, value_name = "FILE", global = true, env = "XLGANTT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a timeline from a task workbook
    Render {
        /// Task workbook path or http(s) URL
        #[arg(value_name = "TASKS")]
        tasks: String,

        /// Release workbook path or http(s) URL
        #[arg(long, value_name = "SRC")]
        releases: Option<String>,

        /// Show the releases row
        #[arg(long)]
        show_releases: bool,

        /// Keep only these task types
        #[arg(long = "type", value_name = "TYPE")]
        task_types: Vec<String>,

        /// Keep only these statuses
        #[arg(long = "status", value_name = "STATUS")]
        statuses: Vec<String>,

        /// Keep only these priorities
        #[arg(long = "priority", value_name = "PRIORITY")]
        priorities: Vec<String>,

        /// Keep only these epics
        #[arg(long = "epic", value_name = "EPIC")]
        epics: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Dark page theme
        #[arg(long)]
        dark: bool,

        /// Omit the phase legend
        #[arg(long)]
        no_legend: bool,
    },

    /// List the distinct values of a task field
    Values {
        /// Task workbook path or http(s) URL
        #[arg(value_name = "TASKS")]
        tasks: String,

        /// Field name (taskType, taskStatus, priority, epicName, ...)
        #[arg(long)]
        field: TaskField,
    },

    /// Write starter task and release workbooks
    Init {
        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

struct RenderArgs {
    tasks: String,
    releases: Option<String>,
    show_releases: bool,
    filters: FilterSet,
    format: OutputFormat,
    output: Option<PathBuf>,
    title: Option<String>,
    dark: bool,
    no_legend: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::discover(cli.config.as_deref(), Path::new("."))
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Render {
            tasks,
            releases,
            show_releases,
            task_types,
            statuses,
            priorities,
            epics,
            format,
            output,
            title,
            dark,
            no_legend,
        } => {
            let args = RenderArgs {
                tasks,
                releases,
                show_releases,
                filters: build_filters(task_types, statuses, priorities, epics),
                format,
                output,
                title,
                dark,
                no_legend,
            };
            cmd_render(config, args).await
        }
        Commands::Values { tasks, field } => cmd_values(config, &tasks, field).await,
        Commands::Init { output, force } => cmd_init(&config, &output, force),
    }
}

/// stderr logging; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Empty flag lists leave their dimension unrestricted
fn build_filters(
    task_types: Vec<String>,
    statuses: Vec<String>,
    priorities: Vec<String>,
    epics: Vec<String>,
) -> FilterSet {
    let non_empty = |values: Vec<String>| (!values.is_empty()).then_some(values);
    FilterSet {
        task_types: non_empty(task_types),
        statuses: non_empty(statuses),
        priorities: non_empty(priorities),
        epics: non_empty(epics),
    }
}

async fn cmd_render(mut config: Config, args: RenderArgs) -> Result<()> {
    if args.show_releases {
        config.timeline.show_releases = true;
    }

    let mut renderer = VisTimelineRenderer::new().label_width(config.timeline.label_width.clone());
    if let Some(title) = &args.title {
        renderer = renderer.title(title.clone());
    }
    if args.dark {
        renderer = renderer.dark_theme();
    }
    if args.no_legend {
        renderer = renderer.hide_legend();
    }

    let mut viewer = GanttViewer::new(renderer, "timeline", config);
    viewer
        .set_filters(args.filters)
        .context("Failed to apply filters")?;
    viewer
        .load_tasks(Source::parse(&args.tasks))
        .await
        .with_context(|| format!("Failed to load tasks from {}", args.tasks))?;
    if let Some(releases) = &args.releases {
        viewer
            .load_releases(Source::parse(releases))
            .await
            .with_context(|| format!("Failed to load releases from {}", releases))?;
    }

    log_timeline(viewer.timeline());

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(viewer.timeline())
            .context("Failed to serialize timeline")?,
        OutputFormat::Html => viewer
            .widget()
            .and_then(|widget| widget.html())
            .map(str::to_string)
            .context("Timeline was not rendered")?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Created: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    viewer.destroy();
    Ok(())
}

fn log_timeline(timeline: &Timeline) {
    let Some((start, end)) = timeline.date_range() else {
        tracing::warn!("no tasks to show");
        return;
    };
    tracing::info!(
        %start,
        %end,
        rows = timeline.groups.len(),
        items = timeline.items.len(),
        "timeline span"
    );
    for group in &timeline.groups {
        tracing::debug!(
            row = group.id,
            label = %group.label,
            items = timeline.items_in_group(group.id).count(),
            "timeline row"
        );
    }
}

async fn cmd_values(config: Config, tasks: &str, field: TaskField) -> Result<()> {
    let mut viewer = GanttViewer::vis("timeline", config);
    viewer
        .load_tasks(Source::parse(tasks))
        .await
        .with_context(|| format!("Failed to load tasks from {}", tasks))?;

    for value in viewer.unique_values(field) {
        println!("{}", value);
    }
    Ok(())
}

fn cmd_init(config: &Config, dir: &Path, force: bool) -> Result<()> {
    let tasks = dir.join("tasks.xlsx");
    let releases = dir.join("releases.xlsx");

    if !force {
        for path in [&tasks, &releases] {
            if path.exists() {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
        }
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let writer = TemplateWriter::new(config.columns.clone());
    writer
        .write_tasks(&tasks)
        .with_context(|| format!("Failed to write {}", tasks.display()))?;
    writer
        .write_releases(&releases)
        .with_context(|| format!("Failed to write {}", releases.display()))?;

    println!("Created: {}", tasks.display());
    println!("Created: {}", releases.display());
    Ok(())
}
