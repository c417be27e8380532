use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use directory::{Hospital, HospitalDirectory, SPECIALTIES};
use finder::{
    FileSource, FinderConfig, HospitalSource, LoadState, SearchResults, SearchSession, StaticSource,
};
use pipeline::{filter, QueryField, QueryState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Medisphere - hospital finder
#[derive(Parser)]
#[command(name = "medisphere")]
#[command(about = "Search the Medisphere hospital directory", long_about = None)]
struct Cli {
    /// JSON file or directory of JSON files; the built-in sample is used if omitted
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Quiet period before results are recomputed in interactive mode
    #[arg(long, default_value = "300")]
    debounce_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the directory once and print matching hospitals
    Search {
        /// Hospital name (also matches location)
        #[arg(long, default_value = "")]
        name: String,

        /// Location substring
        #[arg(long, default_value = "")]
        location: String,

        /// Specialty substring
        #[arg(long, default_value = "")]
        specialty: String,
    },

    /// List the specialty catalog and the specialties present in the data
    Specialties,

    /// Read query edits from stdin and print each debounced result set
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FinderConfig::default().with_debounce_ms(cli.debounce_ms);

    match cli.command {
        Commands::Search {
            name,
            location,
            specialty,
        } => {
            let directory = load_directory(cli.data.as_ref())?;
            let query = QueryState::new()
                .with_name_query(name)
                .with_location_query(location)
                .with_tag_query(specialty);
            handle_search(&directory, &query);
        }
        Commands::Specialties => {
            let directory = load_directory(cli.data.as_ref())?;
            handle_specialties(&directory);
        }
        Commands::Interactive => {
            let source: Arc<dyn HospitalSource> = match cli.data {
                Some(path) => Arc::new(FileSource::new(path)),
                None => Arc::new(StaticSource::sample()),
            };
            handle_interactive(config, source).await?;
        }
    }

    Ok(())
}

fn load_directory(path: Option<&PathBuf>) -> Result<HospitalDirectory> {
    let Some(path) = path else {
        return Ok(HospitalDirectory::sample());
    };
    let start = Instant::now();
    let directory = HospitalDirectory::load_from_path(path)
        .with_context(|| format!("Failed to load hospitals from {}", path.display()))?;
    tracing::info!("Loaded {} hospitals in {:?}", directory.len(), start.elapsed());
    Ok(directory)
}

/// Handle the 'search' command
fn handle_search(directory: &HospitalDirectory, query: &QueryState) {
    let results = filter(directory.hospitals(), query);
    print_results(&results, directory.len());
}

/// Handle the 'specialties' command
fn handle_specialties(directory: &HospitalDirectory) {
    println!("{}", "Specialty catalog:".bold().blue());
    for specialty in SPECIALTIES {
        println!("{}{}", "• ".green(), capitalize(specialty));
    }

    let present = directory.specialties();
    println!("{}", format!("In this directory ({}):", present.len()).bold().blue());
    for specialty in present {
        let count = directory
            .hospitals()
            .iter()
            .filter(|h| h.specialties.contains(&specialty))
            .count();
        println!("{}{} ({} hospitals)", "• ".cyan(), specialty, count);
    }
}

/// Handle the 'interactive' command
///
/// Each stdin line is one edit: `name <text>`, `location <text>`,
/// `specialty <text>`, `clear`, `reload`, or `quit`. Results are printed as
/// the session publishes them.
async fn handle_interactive(config: FinderConfig, source: Arc<dyn HospitalSource>) -> Result<()> {
    let mut session = SearchSession::new(config, source)?;
    let mut updates = session.subscribe();

    if let Err(err) = session.load().await {
        tracing::warn!("Initial load failed: {}", err);
    }

    println!(
        "{}",
        "Commands: name|location|specialty <text>, clear, reload, quit".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Command::Edit(field, value)) => session.set_field(field, value),
                    Ok(Command::Clear) => session.clear_filters(),
                    Ok(Command::Reload) => {
                        if let Err(err) = session.reload().await {
                            tracing::warn!("Reload failed: {}", err);
                        }
                    }
                    Ok(Command::Quit) => break,
                    Ok(Command::Noop) => {}
                    Err(err) => eprintln!("{} {}", "error:".red(), err),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let results = updates.borrow_and_update().clone();
                print_update(&results);
            }
        }
    }

    session.shutdown();
    Ok(())
}

enum Command {
    Edit(QueryField, String),
    Clear,
    Reload,
    Quit,
    Noop,
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };
    match word {
        "" => Ok(Command::Noop),
        "clear" => Ok(Command::Clear),
        "reload" => Ok(Command::Reload),
        "quit" | "exit" => Ok(Command::Quit),
        field => {
            let field: QueryField = field.parse().map_err(|e: String| anyhow!(e))?;
            Ok(Command::Edit(field, rest.to_string()))
        }
    }
}

fn print_update(results: &SearchResults) {
    match &results.load_state {
        LoadState::Loading => println!("{}", "Loading hospitals...".dimmed()),
        LoadState::LoadFailed(reason) => {
            println!("{} {}", "Could not load hospitals:".red().bold(), reason)
        }
        LoadState::Loaded => {
            let query = &results.query;
            println!(
                "{}",
                format!(
                    "[#{}] name={:?} location={:?} specialty={:?}",
                    results.generation,
                    query.name_query(),
                    query.location_query(),
                    query.tag_query()
                )
                .dimmed()
            );
            print_results(&results.hospitals, results.total);
        }
    }
}

/// Helper function to format and print matching hospitals
fn print_results(hospitals: &[Hospital], total: usize) {
    if hospitals.is_empty() {
        println!("{}", "No hospitals found".bold().yellow());
        println!("Try adjusting your search criteria, or `clear` to reset filters");
        return;
    }

    println!(
        "{}",
        format!("{} of {} hospitals:", hospitals.len(), total).bold().blue()
    );
    for (i, hospital) in hospitals.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), hospital.name.bold());
        if !hospital.location.is_empty() {
            println!("   {}", hospital.location);
        }
        let summary = hospital.specialty_summary(2);
        if !summary.is_empty() {
            println!("   {}", summary.cyan());
        }
        if !hospital.website.is_empty() {
            println!("   {}", hospital.website.dimmed());
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
