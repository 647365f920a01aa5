//! Leadhunter CLI entry point.
//!
//! Provides `search`, `catalog`, and `link` subcommands. A session lives for
//! one `search` invocation: discovery, optional batch drafting, and optional
//! export all run against the same in-memory board.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use leadhunter::access::AccessGate;
use leadhunter::campaign::{mailto_link, whatsapp_link, CampaignStats};
use leadhunter::catalog::{self, DeepLink, SearchForm};
use leadhunter::config::{self, Config};
use leadhunter::credentials::load_runtime_credentials;
use leadhunter::export;
use leadhunter::gateway::{AiGateway, DiscoverySettings};
use leadhunter::model::{Prospect, ProspectId};
use leadhunter::orchestrator::{DraftOrchestrator, ProspectBoard, SearchOrchestrator, SearchState};
use leadhunter::providers::router::ModelRouter;

/// Base URL used for shareable agent links.
const DEFAULT_LINK_BASE: &str = "https://leadhunter.app/";

/// Leadhunter: find businesses losing money to poor service and draft outreach.
#[derive(Parser)]
#[command(name = "leadhunter", version, about)]
struct Cli {
    /// Config file (default: `$LEADHUNTER_CONFIG` or `~/.leadhunter/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON logs to this directory in addition to stderr.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Default log level when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Discover prospects, optionally draft outreach and export a campaign.
    Search(SearchArgs),
    /// List catalog categories and countries, or the entries under one.
    Catalog {
        /// Show the sub-industries of this category.
        #[arg(long)]
        category: Option<String>,
        /// Show the cities of this country.
        #[arg(long)]
        country: Option<String>,
    },
    /// Print a shareable link that pre-selects a country and city.
    Link {
        /// Country to pre-select.
        #[arg(long)]
        country: String,
        /// City to pre-select.
        #[arg(long)]
        city: Option<String>,
        /// Base URL of the agent console.
        #[arg(long, default_value = DEFAULT_LINK_BASE)]
        base: String,
    },
}

/// Options for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Shared agent passphrase (prompted for when required and omitted).
    #[arg(long)]
    passphrase: Option<String>,

    /// Pre-select country and city from a shared link or query string.
    #[arg(long)]
    link: Option<String>,

    /// Industry category.
    #[arg(long)]
    category: Option<String>,

    /// Sub-industry within the category.
    #[arg(long)]
    industry: Option<String>,

    /// Country.
    #[arg(long)]
    country: Option<String>,

    /// City within the country.
    #[arg(long)]
    city: Option<String>,

    /// Free-form location instead of a catalog city.
    #[arg(long)]
    location: Option<String>,

    /// Draft outreach for every prospect after discovery.
    #[arg(long)]
    draft_all: bool,

    /// Draft outreach for the named prospect (repeatable).
    #[arg(long = "draft", value_name = "NAME")]
    draft: Vec<String>,

    /// Mark the named, already drafted prospect as contacted (repeatable).
    #[arg(long = "contacted", value_name = "NAME")]
    contacted: Vec<String>,

    /// Export the campaign sheet to this directory (default: `[export] directory`).
    #[arg(long)]
    export: Option<Option<PathBuf>>,

    /// Also write the standard prospect sheet to this file.
    #[arg(long)]
    prospects_csv: Option<PathBuf>,

    /// Print the final board as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logging_guard = match &cli.log_dir {
        Some(dir) => Some(leadhunter::logging::init_production(dir, &cli.log_level)?),
        None => {
            leadhunter::logging::init_cli(&cli.log_level);
            None
        }
    };

    match cli.command {
        Command::Search(args) => handle_search(cli.config, args).await,
        Command::Catalog { category, country } => handle_catalog(category, country),
        Command::Link {
            country,
            city,
            base,
        } => handle_link(country, city, &base),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p,
        None => config::config_path_with(|key| std::env::var(key).ok())?,
    };
    config::load_or_default(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Build the form from the config defaults, a deep link, and explicit flags
/// (in that order of precedence, lowest first).
fn build_form(config: &Config, args: &SearchArgs) -> anyhow::Result<SearchForm> {
    let link = match &args.link {
        Some(raw) => DeepLink::parse(raw),
        None => DeepLink {
            country: Some(config.search.country.clone()),
            city: Some(config.search.city.clone()),
        },
    };
    let mut form = SearchForm::from_deep_link(&link);

    let category = args.category.as_deref().unwrap_or(&config.search.category);
    if let Err(e) = form.select_category(category) {
        warn!(error = %e, "keeping default category");
    }
    if let Some(industry) = &args.industry {
        form.select_sub_industry(industry)?;
    }
    if let Some(country) = &args.country {
        form.select_country(country)?;
    }
    if let Some(city) = &args.city {
        form.select_city(city)?;
    }
    if let Some(location) = &args.location {
        form.use_custom_location(location.clone());
    }
    Ok(form)
}

fn unlock(config: &Config, passphrase: Option<String>) -> anyhow::Result<()> {
    let gate = AccessGate::from_config(&config.access);
    if gate.is_open() {
        return Ok(());
    }
    let attempt = match passphrase {
        Some(p) => p,
        None => {
            eprint!("Passphrase: ");
            std::io::stderr().flush()?;
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read passphrase")?;
            line.trim_end_matches(['\r', '\n']).to_owned()
        }
    };
    gate.unlock(&attempt)?;
    Ok(())
}

async fn handle_search(config_path: Option<PathBuf>, args: SearchArgs) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    unlock(&config, args.passphrase.clone())?;

    let form = build_form(&config, &args)?;
    let filters = form
        .to_filters()?
        .with_pain_points(config.search.pain_points.clone());

    let credentials = load_runtime_credentials(&config::config_dir()?)
        .context("failed to load credentials")?;
    let router = ModelRouter::from_config(&config.models, &credentials)
        .context("failed to create model router")?;
    let settings = DiscoverySettings {
        prospect_count: config.search.prospect_count,
        min_review_count: config.search.min_review_count,
        ..DiscoverySettings::default()
    };
    let gateway = Arc::new(AiGateway::new(
        Arc::new(router),
        config.persona.clone(),
        settings,
    ));

    let board = ProspectBoard::new();
    let search = SearchOrchestrator::new(gateway.clone(), board.clone());
    let drafts = DraftOrchestrator::new(gateway, board.clone());

    match search.submit(filters).await? {
        SearchState::ResultsReady { count } => info!(count, "prospects found"),
        SearchState::Failed(failure) => {
            println!("{}", failure.message());
            return Ok(());
        }
        SearchState::Idle | SearchState::Searching => return Ok(()),
    }

    if args.draft_all {
        let report = drafts.draft_all().await?;
        for failure in &report.failures {
            eprintln!("draft failed for {}: {}", failure.prospect_id, failure.reason);
        }
    }

    for name in &args.draft {
        let Some(id) = find_by_name(&board, name) else {
            eprintln!("no prospect named {name:?}");
            continue;
        };
        if let Err(e) = drafts.draft_one(&id).await {
            warn!(prospect_id = %id, error = %e, "single draft failed");
            eprintln!("draft failed for {name}: {e}");
        }
    }

    for name in &args.contacted {
        let Some(id) = find_by_name(&board, name) else {
            eprintln!("no prospect named {name:?}");
            continue;
        };
        if let Err(e) = board.mark_contacted(&id) {
            eprintln!("cannot mark {name} as contacted: {e}");
        }
    }

    let snapshot = board.snapshot();

    if let Some(path) = &args.prospects_csv {
        if let Err(e) = export::export_prospects_to_file(path, &snapshot) {
            warn!(error = %e, "prospect export failed");
            eprintln!("Export failed. Please try again.");
        }
    }

    if let Some(dir) = &args.export {
        let dir = dir
            .clone()
            .or_else(|| config.export.directory.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let today = chrono::Local::now().date_naive();
        match export::export_campaign_to_dir(&dir, &snapshot, today) {
            Ok(path) => println!("Campaign exported to {}", path.display()),
            Err(e) => {
                warn!(error = %e, "campaign export failed");
                eprintln!("Export failed. Please try again.");
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

fn find_by_name(board: &ProspectBoard, name: &str) -> Option<ProspectId> {
    board
        .snapshot()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .map(|p| p.id().clone())
}

fn print_summary(prospects: &[Prospect]) {
    for p in prospects {
        let hot = if p.is_hot() { " [HOT]" } else { "" };
        println!(
            "{}{hot}\n  {} | {} | score {} | est. loss ${}/mo | {}",
            p.name,
            p.category,
            p.address,
            p.sentiment_analysis.score,
            leadhunter::gateway::prompts::format_usd(p.sentiment_analysis.estimated_monthly_loss),
            p.contact_status(),
        );
        if !p.sentiment_analysis.summary.is_empty() {
            println!("  {}", p.sentiment_analysis.summary);
        }
        if let Some(link) = whatsapp_link(p) {
            println!("  WhatsApp: {link}");
        }
        if let Some(link) = mailto_link(p) {
            println!("  Email: {link}");
        }
    }

    let stats = CampaignStats::from_prospects(prospects);
    println!(
        "\n{} prospects, {} hot, {} drafted, {} contacted, total est. loss ${}/mo",
        stats.total,
        stats.hot_leads,
        stats.drafted,
        stats.contacted,
        leadhunter::gateway::prompts::format_usd(stats.total_estimated_loss),
    );
}

fn handle_catalog(category: Option<String>, country: Option<String>) -> anyhow::Result<()> {
    if let Some(category) = category {
        let items = catalog::sub_industries(&category)
            .ok_or_else(|| catalog::CatalogError::UnknownCategory(category.clone()))?;
        items.iter().for_each(|i| println!("{i}"));
        return Ok(());
    }
    if let Some(country) = country {
        let items = catalog::cities(&country)
            .ok_or_else(|| catalog::CatalogError::UnknownCountry(country.clone()))?;
        items.iter().for_each(|c| println!("{c}"));
        return Ok(());
    }

    println!("Categories:");
    catalog::categories().for_each(|c| println!("  {c}"));
    println!("Countries:");
    catalog::countries().for_each(|c| println!("  {c}"));
    Ok(())
}

fn handle_link(country: String, city: Option<String>, base: &str) -> anyhow::Result<()> {
    let link = DeepLink {
        country: Some(country),
        city,
    };
    let form = SearchForm::from_deep_link(&link);
    println!("{}", DeepLink::for_form(&form).to_url(base)?);
    Ok(())
}
