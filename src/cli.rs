// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
// CLI argument definitions for phpfeature
//
// Separated from main.rs so that build.rs can include this file
// to generate the man page via clap_mangen.

use std::path::PathBuf;

use clap::Parser;

/// Standalone actions that don't require a feature argument
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StandaloneAction {
    List,
    Releases,
}

/// CLI argument parser - bools required for clap flag parsing
#[derive(Parser)]
#[command(
    name = "phpfeature",
    version,
    about = "PHP Feature Support Checker",
    disable_version_flag = true
)]
#[command(arg(clap::Arg::new("version").long("version").action(clap::ArgAction::Version).help("Print version")))]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Features to check (e.g. namespaces traits)
    #[arg(value_name = "FEATURE")]
    pub features: Vec<String>,

    /// PHP version to check against; defaults to the installed interpreter
    #[arg(short = 'p', long = "php", value_name = "VERSION")]
    pub php: Option<String>,

    /// Print the minimum PHP version supporting all features
    #[arg(short = 'm', long = "minimum", conflicts_with_all = ["list", "releases", "import"])]
    pub minimum: bool,

    /// List known features and their requirements
    #[arg(short = 'l', long = "list", conflicts_with_all = ["minimum", "releases", "import"])]
    pub list: bool,

    /// List known PHP releases
    #[arg(short = 'r', long = "releases", conflicts_with_all = ["minimum", "list", "import"])]
    pub releases: bool,

    /// Store a release catalog file in the data directory
    #[arg(long = "import", value_name = "FILE", conflicts_with_all = ["minimum", "list", "releases"])]
    pub import: Option<PathBuf>,

    /// Read features from a JSON file instead of the built-in registry
    #[arg(long = "features", value_name = "FILE")]
    pub features_file: Option<PathBuf>,

    /// Read releases from a JSON file instead of the default catalog
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Make the operation more talkative
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion script (only bash is supported currently)
    #[arg(long = "completion", value_name = "SHELL", value_parser = parse_completion_shell)]
    pub completion: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn standalone_action(&self) -> Option<StandaloneAction> {
        match (self.list, self.releases) {
            (true, _) => Some(StandaloneAction::List),
            (_, true) => Some(StandaloneAction::Releases),
            _ => None,
        }
    }
}

fn parse_completion_shell(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "bash" => Ok(s.to_lowercase()),
        _ => Err(format!("unsupported shell: {s} (only 'bash' is supported)")),
    }
}
