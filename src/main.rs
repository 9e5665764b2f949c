//! dnspick - DNS resolver latency tester.
//!
//! Binary entry point for the dnspick CLI application.

#![warn(clippy::all, warnings)]
#![warn(clippy::pedantic, clippy::nursery)]

use dnspick::cli::{Commands, OutputFormat};
use dnspick::config::store::{self, UserStore};
use dnspick::dns::{catalog, scheduler, types::ResolverEntry, types::TestDomain, Prober, TestEvent};
use dnspick::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set up logging based on verbosity level.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `quiet` - Enable error-level only logging
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time())
        .init();
}

/// Assemble the resolver list: JSON file override, or catalog built-ins plus
/// the user store, plus any ad-hoc `IP#Name` arguments.
fn load_resolvers(file: Option<PathBuf>, dns_args: &[String]) -> Result<Vec<ResolverEntry>> {
    let mut servers = if let Some(path) = file {
        store::load_resolver_file(path)?
    } else {
        let mut servers = catalog::builtin_resolvers();
        servers.extend(UserStore::open_default().load_resolvers());
        servers
    };
    servers.extend(store::resolvers_from_args(dns_args)?);

    if servers.is_empty() {
        return Err(Error::config("resolver list is empty"));
    }
    Ok(servers)
}

/// Assemble the test-domain list: catalog built-ins plus the user store, with
/// every random-domain entry refreshed so this run cannot hit a stale cache.
fn load_domains() -> Vec<TestDomain> {
    let mut domains = catalog::builtin_domains();
    domains.extend(UserStore::open_default().load_domains());
    catalog::refresh_special_domains(&mut domains);
    domains
}

/// Resolve the `--domain` argument against the catalog.
///
/// Accepts a display name (case-insensitive), a literal domain that matches
/// a catalog entry, or any other literal domain string as-is.
fn pick_domain(domains: &[TestDomain], wanted: Option<&str>) -> Result<String> {
    match wanted {
        None => domains
            .first()
            .map(|d| d.domain.clone())
            .ok_or_else(|| Error::config("no test domains available")),
        Some(wanted) => {
            if let Some(entry) = domains
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(wanted) || d.domain == wanted)
            {
                return Ok(entry.domain.clone());
            }
            if wanted.contains('.') {
                return Ok(wanted.to_string());
            }
            Err(Error::parse(format!("unknown test domain: {wanted}")))
        }
    }
}

/// Run the batch latency test and print ranked results.
async fn run_test(
    domain: Option<String>,
    file: Option<PathBuf>,
    dns_servers: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut servers = load_resolvers(file, &dns_servers)?;
    let domains = load_domains();
    let domain = pick_domain(&domains, domain.as_deref())?;

    println!("Testing {} resolvers against {} ...", servers.len(), domain);

    let names: Vec<String> = servers.iter().map(|s| s.name.clone()).collect();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    // Progress printer; the measurement loop only sends events.
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                TestEvent::ServerTested { index, outcome } => {
                    let latency = outcome
                        .latency_ms
                        .map_or_else(|| outcome.status.to_string(), |ms| format!("{ms} ms"));
                    println!("  {:<20} {}", names[index], latency);
                }
                TestEvent::Progress { tested, total } => {
                    tracing::debug!("progress: {tested}/{total}");
                }
                TestEvent::Finished { .. } => {}
            }
        }
    });

    let prober = Prober::new();
    let report = scheduler::run_batch(&prober, &mut servers, &domain, Some(&tx)).await;
    drop(tx);
    let _ = printer.await;

    println!();
    match format {
        OutputFormat::Table => print_results_table(&servers),
        OutputFormat::Json => print_results_json(&servers)?,
        OutputFormat::Csv => print_results_sv(&servers, ","),
        OutputFormat::Tsv => print_results_sv(&servers, "\t"),
    }

    println!();
    match report.winner {
        Some(idx) => {
            let winner = &servers[idx];
            let secondary = winner
                .secondary
                .map_or_else(String::new, |ip| format!(" / {ip}"));
            println!(
                "Fastest resolver: {} ({}{secondary}) at {}",
                winner.name,
                winner.primary,
                winner.latency_display()
            );
        }
        None => println!("No resolver produced a measurement."),
    }

    Ok(())
}

/// Print ranked results in table format.
fn print_results_table(servers: &[ResolverEntry]) {
    println!(
        "{:<4} {:<20} {:<18} {:<10} {:<10}",
        "#", "Name", "Primary", "Latency", "Status"
    );
    println!("{}", "-".repeat(66));

    for (idx, s) in servers.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:<18} {:<10} {:<10}",
            idx + 1,
            s.name,
            s.primary,
            s.latency_ms
                .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms")),
            s.status
        );
    }
}

/// Measurement row for structured output.
#[derive(Serialize)]
struct ResultRow<'a> {
    name: &'a str,
    primary: String,
    secondary: Option<String>,
    latency_ms: Option<u32>,
    status: String,
    detail: &'a str,
}

impl<'a> ResultRow<'a> {
    fn from_entry(entry: &'a ResolverEntry) -> Self {
        Self {
            name: &entry.name,
            primary: entry.primary.to_string(),
            secondary: entry.secondary.map(|ip| ip.to_string()),
            latency_ms: entry.latency_ms,
            status: entry.status.to_string(),
            detail: &entry.status_detail,
        }
    }
}

/// Print ranked results in JSON format.
fn print_results_json(servers: &[ResolverEntry]) -> Result<()> {
    let rows: Vec<ResultRow> = servers.iter().map(ResultRow::from_entry).collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Print ranked results in CSV/TSV format.
fn print_results_sv(servers: &[ResolverEntry], sep: &str) {
    println!(
        "#{}{}",
        sep,
        ["Name", "Primary", "Latency(ms)", "Status"].join(sep)
    );
    for (idx, s) in servers.iter().enumerate() {
        let latency = s
            .latency_ms
            .map_or_else(|| "-1".to_string(), |ms| ms.to_string());
        println!(
            "{}{sep}{}{sep}{}{sep}{latency}{sep}{}",
            idx + 1,
            s.name,
            s.primary,
            s.status
        );
    }
}

/// List resolvers or test domains.
fn run_list(domains: bool) -> Result<()> {
    if domains {
        let list = load_domains();
        println!("Test domains ({}):\n", list.len());
        println!("{:<20} {:<28} {:<10}", "Name", "Domain", "Category");
        println!("{}", "-".repeat(60));
        for d in &list {
            let marker = if d.is_custom { " (custom)" } else { "" };
            println!("{:<20} {:<28} {:<10}{marker}", d.name, d.domain, d.category);
        }
    } else {
        let list = load_resolvers(None, &[])?;
        println!("Resolvers ({}):\n", list.len());
        println!("{:<20} {:<18} {:<18}", "Name", "Primary", "Secondary");
        println!("{}", "-".repeat(58));
        for s in &list {
            let secondary = s
                .secondary
                .map_or_else(|| "-".to_string(), |ip| ip.to_string());
            let marker = if s.is_custom { " (custom)" } else { "" };
            println!("{:<20} {:<18} {:<18}{marker}", s.name, s.primary, secondary);
        }
    }
    Ok(())
}

/// Add a user-defined resolver to the store.
fn run_add(
    name: String,
    primary: std::net::IpAddr,
    secondary: Option<std::net::IpAddr>,
) -> Result<()> {
    let store = UserStore::open_default();
    let mut custom = store.load_resolvers();
    if custom.iter().any(|e| e.name == name) {
        return Err(Error::config(format!("resolver '{name}' already exists")));
    }
    custom.push(ResolverEntry::custom(name.clone(), primary, secondary));
    store.save_resolvers(&custom)?;
    println!("Added resolver: {name}");
    Ok(())
}

/// Remove a user-defined resolver from the store.
fn run_remove(name: &str) -> Result<()> {
    let store = UserStore::open_default();
    let mut custom = store.load_resolvers();
    let before = custom.len();
    custom.retain(|e| e.name != name);
    if custom.len() == before {
        return Err(Error::config(format!("no custom resolver named '{name}'")));
    }
    store.save_resolvers(&custom)?;
    println!("Removed resolver: {name}");
    Ok(())
}

/// Add a user-defined test domain to the store.
fn run_add_domain(name: String, domain: String, category: String) -> Result<()> {
    let store = UserStore::open_default();
    let mut custom = store.load_domains();
    if custom.iter().any(|d| d.name == name) {
        return Err(Error::config(format!("test domain '{name}' already exists")));
    }
    custom.push(TestDomain::custom(name.clone(), domain, category));
    store.save_domains(&custom)?;
    println!("Added test domain: {name}");
    Ok(())
}

/// Remove a user-defined test domain from the store.
fn run_remove_domain(name: &str) -> Result<()> {
    let store = UserStore::open_default();
    let mut custom = store.load_domains();
    let before = custom.len();
    custom.retain(|d| d.name != name);
    if custom.len() == before {
        return Err(Error::config(format!(
            "no custom test domain named '{name}'"
        )));
    }
    store.save_domains(&custom)?;
    println!("Removed test domain: {name}");
    Ok(())
}

/// Main entry point for the dnspick CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = dnspick::cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("dnspick starting...");

    match cli.command {
        Some(Commands::Test {
            domain,
            file,
            dns_servers,
        }) => {
            run_test(domain, file, dns_servers, cli.format).await?;
        }

        Some(Commands::List { domains }) => {
            run_list(domains)?;
        }

        Some(Commands::Add {
            name,
            primary,
            secondary,
        }) => {
            run_add(name, primary, secondary)?;
        }

        Some(Commands::Remove { name }) => {
            run_remove(&name)?;
        }

        Some(Commands::AddDomain {
            name,
            domain,
            category,
        }) => {
            run_add_domain(name, domain, category)?;
        }

        Some(Commands::RemoveDomain { name }) => {
            run_remove_domain(&name)?;
        }

        None => {
            // Default to running the test over the full catalog.
            run_test(None, None, Vec::new(), cli.format).await?;
        }
    }

    Ok(())
}
