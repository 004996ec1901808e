//! Command-line front end for the sales dashboard.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sales_dashboard::models::Metric;
use sales_dashboard::report::render_text;
use sales_dashboard::{
    export, DashboardConfig, Dimension, FilterOptions, SalesDashboard, SalesDashboardBuilder,
    Session,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sales-dashboard")]
#[command(about = "Sales analytics over periodic CSV exports", long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./sales-dashboard.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CSV path or http(s) URL, overriding the config
    #[arg(long, global = true)]
    source: Option<String>,
    /// Never download; use the cached copy of a URL source
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print KPIs, chart data, inactive clients and the decline analysis
    Report(ReportArgs),
    /// List the available values of every filter
    Options,
    /// Print the filtered transactions
    Rows(RowsArgs),
    /// Discard the cached source and ingest it again
    Reload,
    /// Edit client notes
    #[command(subcommand)]
    Note(NoteCommand),
}

/// Decline metric
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMetric {
    /// Sold weight (KG)
    Weight,
    /// Revenue (R$)
    Revenue,
}

impl From<CliMetric> for Metric {
    fn from(cli: CliMetric) -> Self {
        match cli {
            CliMetric::Weight => Metric::Weight,
            CliMetric::Revenue => Metric::Revenue,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDimension {
    Year,
    Month,
    Representative,
    Family,
    State,
    Coordinator,
    Client,
    Product,
}

impl From<CliDimension> for Dimension {
    fn from(cli: CliDimension) -> Self {
        match cli {
            CliDimension::Year => Dimension::Year,
            CliDimension::Month => Dimension::Month,
            CliDimension::Representative => Dimension::Representative,
            CliDimension::Family => Dimension::Family,
            CliDimension::State => Dimension::State,
            CliDimension::Coordinator => Dimension::Coordinator,
            CliDimension::Client => Dimension::Client,
            CliDimension::Product => Dimension::Product,
        }
    }
}

/// Per-dimension filters. A dimension left out keeps every value.
#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    year: Vec<String>,
    #[arg(long)]
    month: Vec<String>,
    #[arg(long)]
    representative: Vec<String>,
    #[arg(long)]
    family: Vec<String>,
    #[arg(long)]
    state: Vec<String>,
    #[arg(long)]
    coordinator: Vec<String>,
    #[arg(long)]
    client: Vec<String>,
    #[arg(long)]
    product: Vec<String>,
    /// Select nothing on this dimension
    #[arg(long, value_enum)]
    none: Vec<CliDimension>,
}

impl FilterArgs {
    fn values(&self, dim: Dimension) -> &[String] {
        match dim {
            Dimension::Year => &self.year,
            Dimension::Month => &self.month,
            Dimension::Representative => &self.representative,
            Dimension::Family => &self.family,
            Dimension::State => &self.state,
            Dimension::Coordinator => &self.coordinator,
            Dimension::Client => &self.client,
            Dimension::Product => &self.product,
        }
    }

    fn session(&self, options: &FilterOptions) -> Session {
        let mut session = Session::new(options);
        for dim in Dimension::ALL {
            let values = self.values(dim);
            if !values.is_empty() {
                session = session.with_values(dim, values.iter().cloned());
            }
        }
        for dim in &self.none {
            session = session.toggle_all((*dim).into(), false, options);
        }
        session
    }
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long, value_enum, default_value = "weight")]
    metric: CliMetric,
    /// Reference date for the inactivity cutoff (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,
    /// Write the decline table to this .xlsx file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct RowsArgs {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long, default_value_t = 50)]
    limit: usize,
    #[arg(long, default_value_t = 0)]
    offset: usize,
}

#[derive(Subcommand)]
enum NoteCommand {
    /// Save a note for a client
    Set { client: String, text: String },
    /// Delete a client's note
    Remove { client: String },
    /// Print a client's note
    Show { client: String },
    /// Print every note
    List,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref()).context("loading config")?;
    let mut builder = SalesDashboardBuilder::from_config(&config);
    if let Some(source) = &cli.source {
        builder = builder.source(source.clone());
    }
    if cli.offline {
        builder = builder.offline(true);
    }
    let dashboard = builder.build().context("initializing dashboard")?;
    tracing::debug!("{}", dashboard);

    match cli.command {
        Command::Report(args) => run_report(&dashboard, args),
        Command::Options => run_options(&dashboard),
        Command::Rows(args) => run_rows(&dashboard, args),
        Command::Reload => {
            let summary = dashboard.reload().context("reloading source")?;
            println!("{}", summary);
            Ok(())
        }
        Command::Note(cmd) => run_note(&dashboard, cmd),
    }
}

fn run_report(dashboard: &SalesDashboard, args: ReportArgs) -> Result<()> {
    let options = dashboard.options().context("loading source")?;
    let session = args
        .filters
        .session(&options)
        .with_metric(args.metric.into());
    let today = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let outcome = dashboard.report_as_of(&session, today)?;
    print!("{}", render_text(&outcome, &dashboard.annotations()));

    if let Some(path) = args.export {
        let Some(decline) = outcome.report().and_then(|r| r.decline.report()) else {
            bail!("no decline table to export for this selection");
        };
        export::write_decline_workbook(decline, &path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_options(dashboard: &SalesDashboard) -> Result<()> {
    let options = dashboard.options().context("loading source")?;
    for dim in Dimension::ALL {
        println!("{} ({}): {}", dim.label(), dim, options.get(dim).join(", "));
    }
    Ok(())
}

fn run_rows(dashboard: &SalesDashboard, args: RowsArgs) -> Result<()> {
    let options = dashboard.options().context("loading source")?;
    let session = args.filters.session(&options);
    let view = dashboard.filter(session.selection())?;
    let rows = view.rows(Some(args.limit), Some(args.offset))?;
    println!("{} rows match", view.row_count()?);
    for tx in rows {
        println!("{}", serde_json::to_string(&tx)?);
    }
    Ok(())
}

fn run_note(dashboard: &SalesDashboard, cmd: NoteCommand) -> Result<()> {
    let mut store = dashboard.annotations();
    match cmd {
        NoteCommand::Set { client, text } => {
            store.set(&client, &text);
            store.save()?;
        }
        NoteCommand::Remove { client } => {
            if store.remove(&client).is_none() {
                bail!("no note for {}", client);
            }
            store.save()?;
        }
        NoteCommand::Show { client } => match store.get(&client) {
            Some(note) => println!("{}", note),
            None => bail!("no note for {}", client),
        },
        NoteCommand::List => {
            for (client, note) in store.iter() {
                println!("{}: {}", client, note);
            }
        }
    }
    Ok(())
}
