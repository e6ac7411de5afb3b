// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! PHP Feature Support Checker (phpfeature) - Main Application
//!
//! Command-line front end for the phpfeature library. It supports:
//! - Checking whether a PHP version supports one or more features
//! - Computing the minimum PHP version required by a feature set
//! - Listing the known features and PHP releases
//! - Importing a release catalog for later runs

mod cli;

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, StandaloneAction};
use phpfeature::config::{import_catalog, load_catalog, load_features};
use phpfeature::{FeatureMap, ReleaseCatalog, Resolver, format_catalog_age};

/// Main application entry point
///
/// Parses command line arguments and dispatches to the matching command.
/// Any error is printed to stderr and turns into a non-zero exit status.
fn main() {
    let cli = Cli::parse();

    // Handle completion generation first (exits immediately)
    if cli.completion.is_some() {
        print_bash_completion();
        return;
    }

    init_logging(cli.verbose);

    // Note: conflicts_with_all ensures mutual exclusivity at parse time
    let result = if let Some(path) = cli.import.as_deref() {
        cmd_import(path)
    } else if let Some(action) = cli.standalone_action() {
        match action {
            StandaloneAction::List => cmd_list(&cli),
            StandaloneAction::Releases => cmd_releases(&cli),
        }
    } else if cli.features.is_empty() {
        Err("phpfeature: missing feature\nTry 'phpfeature --help' for more information.".into())
    } else if cli.minimum {
        cmd_minimum(&cli)
    } else {
        cmd_check(&cli)
    };

    if let Err(e) = result {
        eprintln!("{e}");
        exit(1);
    }
}

/// Route library logs to stderr, at debug level in verbose mode
///
/// `RUST_LOG` takes precedence when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

// =============================================================================
// Command Implementation Functions
// =============================================================================

/// Build a resolver for the requested or installed PHP version
fn build_resolver(cli: &Cli) -> Result<Resolver<FeatureMap>, Box<dyn Error>> {
    let (features, source) = load_features(cli.features_file.as_deref())?;
    info!("Using features from {source}");

    let resolver = match cli.php.as_deref() {
        Some(version) => Resolver::with_target(version, features)?,
        None => Resolver::for_platform(features)?,
    };
    debug!("Target PHP version: {}", resolver.target());
    Ok(resolver)
}

/// Check feature support against the target version
///
/// Prints a confirmation when everything is supported; otherwise reports the
/// unsupported features on stderr and fails.
fn cmd_check(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let resolver = build_resolver(cli)?;
    let missing = resolver.unsupported(cli.features.as_slice())?;

    if !missing.is_empty() {
        return Err(format!(
            "PHP {} does not support: {}",
            resolver.target(),
            missing.join(", ")
        )
        .into());
    }

    println!(
        "PHP {} supports: {}",
        resolver.target(),
        cli.features.join(", ")
    );
    Ok(())
}

/// Print the minimum PHP version that supports all requested features
///
/// Prints `none` when no requested feature is version-gated.
fn cmd_minimum(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let resolver = build_resolver(cli)?;
    let (catalog, source) = load_catalog(cli.catalog_file.as_deref())?;
    info!("Using releases from {source}");

    match resolver.minimum_required(cli.features.as_slice(), &catalog)? {
        Some(version) => println!("{version}"),
        None => println!("none"),
    }
    Ok(())
}

/// List known features with their requirements
fn cmd_list(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (features, source) = load_features(cli.features_file.as_deref())?;
    info!("Using features from {source}");

    let width = features.names().map(str::len).max().unwrap_or(0);
    for (name, requirements) in features.iter() {
        println!("{name:<width$}  {}", requirements.join(", "));
    }
    Ok(())
}

/// List known releases with their dates
fn cmd_releases(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (catalog, source) = load_catalog(cli.catalog_file.as_deref())?;
    match catalog.updated() {
        Some(updated) => info!(
            "Using releases from {source} (last updated: {})",
            format_catalog_age(updated)
        ),
        None => info!("Using releases from {source}"),
    }

    for release in catalog.releases() {
        println!("{}  {}", release.version, release.date);
    }
    Ok(())
}

/// Validate a catalog file and store it for later runs
fn cmd_import(path: &Path) -> Result<(), Box<dyn Error>> {
    let (destination, catalog) = import_catalog(path)?;
    println!(
        "Imported {} releases into {}",
        catalog.len(),
        destination.display()
    );
    if let Some(latest) = catalog.latest() {
        debug!("Latest release: {} ({})", latest.version, latest.date);
    }
    Ok(())
}

/// Print bash completion script
fn print_bash_completion() {
    print!(
        r#"# bash completion for phpfeature

_phpfeature_completions() {{
    local cur prev
    COMPREPLY=()
    cur="${{COMP_WORDS[COMP_CWORD]}}"
    prev="${{COMP_WORDS[COMP_CWORD-1]}}"

    case "${{prev}}" in
        --import|--features|--catalog)
            COMPREPLY=($(compgen -f -- "${{cur}}"))
            return
            ;;
        -p|--php)
            return
            ;;
    esac

    if [[ "${{cur}}" == -* ]]; then
        local options=(
            "--catalog       (Read releases from a JSON file)"
            "--completion    (Generate shell completion script)"
            "--features      (Read features from a JSON file)"
            "-h              (Print help)"
            "--help          (Print help)"
            "--import        (Store a release catalog file)"
            "-l              (List known features)"
            "--list          (List known features)"
            "-m              (Print the minimum PHP version)"
            "--minimum       (Print the minimum PHP version)"
            "-p              (PHP version to check against)"
            "--php           (PHP version to check against)"
            "-r              (List known PHP releases)"
            "--releases      (List known PHP releases)"
            "-v              (Make the operation more talkative)"
            "--verbose       (Make the operation more talkative)"
            "--version       (Print version)"
        )

        local IFS=$'\n'
        local opt name padded
        local width=$((COLUMNS - 1))
        for opt in "${{options[@]}}"; do
            name="${{opt%%  *}}"
            if [[ "$name" == "${{cur}}"* ]]; then
                printf -v padded "%-${{width}}s" "$opt"
                COMPREPLY+=("$padded")
            fi
        done

        if ((${{#COMPREPLY[@]}} == 1)); then
            COMPREPLY[0]="${{COMPREPLY[0]%%  *}}"
        fi
    else
        COMPREPLY=($(compgen -W "$(phpfeature --list 2>/dev/null | cut -d' ' -f1)" -- "${{cur}}"))
    fi
}}

complete -o nosort -F _phpfeature_completions phpfeature
"#
    );
}
