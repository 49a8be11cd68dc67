mod list;
mod render;
mod schema;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use schemadoc::config::{read_name_list, split_names, ProjectConfig};
use schemadoc::schema::NameFilter;
use schemadoc::source::SourceKind;
use schemadoc::Error;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(version)]
#[command(
    about = "Render database schemas as diagrams and reference documentation",
    long_about = None
)]
pub struct Cli {
    /// Log extraction and rendering details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the schema comes from
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Database file, JSON snapshot, or PostgreSQL connection URL
    pub target: Option<String>,

    /// Source kind: sqlite, postgres, duckdb, or snapshot (inferred from the target if not specified)
    #[arg(short, long)]
    pub source: Option<String>,

    /// PostgreSQL connection URL, used when no target is given
    #[arg(long, env = "PGDATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// YAML project configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Which tables to keep
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only keep these tables (comma-separated, repeatable, `prefix*` allowed)
    #[arg(short, long)]
    pub include: Vec<String>,

    /// Drop these tables (comma-separated, repeatable, `prefix*` allowed)
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,

    /// File with one table name to keep per line
    #[arg(long)]
    pub include_file: Option<PathBuf>,

    /// File with one table name to drop per line
    #[arg(long)]
    pub exclude_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the schema as DOT, D2, Markdown, HTML, JSON, or a custom template
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: dot, d2, markdown, html, json, template (inferred from --output if not specified)
        #[arg(short, long)]
        format: Option<String>,

        /// Template file; implies --format template
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Add a foreign key column to DOT table nodes
        #[arg(long)]
        fk: bool,

        /// Show at most N columns per DOT table node (0 = all)
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        truncate: Option<i64>,

        /// Heading level for Markdown and HTML (1-6)
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        section: Option<i64>,
    },

    /// List table names after filtering
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the JSON Schema of the snapshot format
    Schema {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render {
            source,
            filter,
            output,
            format,
            template,
            fk,
            truncate,
            section,
        } => render::run(
            source, filter, output, format, template, fk, truncate, section,
        ),
        Commands::List { source, filter } => list::run(source, filter),
        Commands::Schema { output } => schema::run(output),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "schemadoc", &mut io::stdout());
            Ok(())
        }
    }
}

impl SourceArgs {
    /// Project configuration from `--config`, or defaults.
    pub fn project_config(&self) -> Result<ProjectConfig, Error> {
        match &self.config {
            Some(path) => ProjectConfig::load(path),
            None => Ok(ProjectConfig::default()),
        }
    }

    /// Resolve the source kind and its target, CLI values first.
    pub fn resolve(&self, config: &ProjectConfig) -> Result<(SourceKind, String), Error> {
        let target = self.target.clone().or_else(|| config.target.clone());

        let kind = match self.source.as_deref().or(config.source.as_deref()) {
            Some(s) => s.parse::<SourceKind>().map_err(Error::Config)?,
            None => infer_kind(target.as_deref(), self.url.is_some()).ok_or_else(|| {
                Error::config("cannot infer the source kind from the target; pass --source")
            })?,
        };

        let target = match kind {
            SourceKind::Postgres => target.or_else(|| self.url.clone()),
            _ => target,
        };

        Ok((kind, target.unwrap_or_default()))
    }
}

fn infer_kind(target: Option<&str>, has_url: bool) -> Option<SourceKind> {
    match target {
        Some(t) if t.starts_with("postgres://") || t.starts_with("postgresql://") => {
            Some(SourceKind::Postgres)
        }
        Some(t) => Path::new(t)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceKind::from_extension),
        None if has_url => Some(SourceKind::Postgres),
        None => None,
    }
}

impl FilterArgs {
    /// Merge config, flag, and file lists into one filter. Fails before any
    /// extraction when both include and exclude names end up present.
    pub fn build(&self, config: &ProjectConfig) -> Result<NameFilter, Error> {
        let mut include = config.include.clone();
        include.extend(split_names(&self.include));
        if let Some(path) = &self.include_file {
            include.extend(read_name_list(path)?);
        }

        let mut exclude = config.exclude.clone();
        exclude.extend(split_names(&self.exclude));
        if let Some(path) = &self.exclude_file {
            exclude.extend(read_name_list(path)?);
        }

        NameFilter::new(&exclude, &include)
    }
}
