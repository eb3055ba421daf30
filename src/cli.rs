//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{harvest_keyword, load_settings};
use crate::error::Result;
use crate::http::create_client;
use crate::mappings::Mappings;
use crate::output::{keyword_filename, write_json};
use crate::probe::{CategoryProbe, NoProbe, WikiProbe};
use crate::process::process_records;

/// KMB Harvester - Download and process image metadata from the
/// Kulturmiljöbild search API.
#[derive(Parser)]
#[command(name = "kmb-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and parse records for the configured keywords.
    Harvest {
        /// Path to the settings file (API key and keywords)
        #[arg(short, long, default_value = "settings.json")]
        settings: PathBuf,

        /// Directory for the per-keyword output files (default: current)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build upload information and categories for harvested records.
    Process {
        /// Path to a harvested data file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory containing the mapping snapshot
        #[arg(short, long, default_value = "mappings")]
        mappings: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "kmb_output.json")]
        output: PathBuf,

        /// Skip the live category-existence probe; guessed categories are
        /// then never used and fallbacks apply deterministically
        #[arg(long)]
        offline: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Harvest { settings, output } => harvest_command(&settings, output.as_deref()),
        Commands::Process {
            input,
            mappings,
            output,
            offline,
        } => process_command(&input, &mappings, &output, offline),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the harvest command.
fn harvest_command(settings_path: &Path, output: Option<&Path>) -> Result<()> {
    let settings = load_settings(settings_path)?;
    let client = create_client()?;
    let output_dir = output.unwrap_or_else(|| Path::new("."));

    for keyword in &settings.keywords {
        println!(
            "{} records for {}",
            style("Fetching").bold(),
            style(keyword).cyan()
        );

        let pb = spinner();
        pb.set_message(format!("Harvesting \"{keyword}\"..."));

        let records = match harvest_keyword(
            &client,
            crate::config::SEARCH_API_URL,
            &settings.api_key,
            keyword,
        ) {
            Ok(records) => records,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        let path = output_dir.join(keyword_filename(keyword));
        write_json(&path, &records)?;
        pb.finish_and_clear();

        println!(
            "  {} {} records to {}",
            style("Fetched").green(),
            records.len(),
            path.display()
        );
    }

    Ok(())
}

/// Execute the process command.
fn process_command(
    input: &Path,
    mappings_dir: &Path,
    output: &Path,
    offline: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(input)?;
    let data = serde_json::from_str(&text)?;

    let pb = spinner();
    pb.set_message("Loading mappings...");
    let mappings = Mappings::load(mappings_dir)?;

    let no_probe = NoProbe;
    let wiki_probe;
    let probe: &dyn CategoryProbe = if offline {
        &no_probe
    } else {
        wiki_probe = WikiProbe::new(create_client()?, WikiProbe::COMMONS_API);
        &wiki_probe
    };

    pb.set_message("Processing records...");
    let outcome = process_records(&data, &mappings, probe);
    write_json(output, &outcome.items)?;
    pb.finish_and_clear();

    println!(
        "{} {} records ({} skipped) to {}",
        style("Processed").green().bold(),
        outcome.items.len(),
        outcome.skipped.len(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_harvest() {
        let cli = Cli::parse_from(["kmb-harvester", "harvest", "--settings", "s.json"]);

        let Commands::Harvest { settings, output } = cli.command else {
            panic!("expected harvest command");
        };
        assert_eq!(settings, PathBuf::from("s.json"));
        assert!(output.is_none());
    }

    #[test]
    fn test_cli_parse_process_defaults() {
        let cli = Cli::parse_from(["kmb-harvester", "process", "--input", "results_katt.json"]);

        let Commands::Process {
            input,
            mappings,
            output,
            offline,
        } = cli.command
        else {
            panic!("expected process command");
        };
        assert_eq!(input, PathBuf::from("results_katt.json"));
        assert_eq!(mappings, PathBuf::from("mappings"));
        assert_eq!(output, PathBuf::from("kmb_output.json"));
        assert!(!offline);
    }

    #[test]
    fn test_cli_parse_process_offline() {
        let cli = Cli::parse_from([
            "kmb-harvester",
            "process",
            "--input",
            "results_katt.json",
            "--offline",
        ]);

        let Commands::Process { offline, .. } = cli.command else {
            panic!("expected process command");
        };
        assert!(offline);
    }
}
