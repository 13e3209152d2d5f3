use anyhow::Result;
use clap::Parser;
use mvm::catalog::DEFAULT_CATALOG_URL;
use mvm::commands::{self, Settings};
use mvm::package::{DEFAULT_ARCHIVE_PATTERN, Platform, TableSource};
use mvm::version::DEFAULT_VERSION_MANIFEST_URL;
use std::path::PathBuf;
use std::time::Duration;

/// mvm - Mod Version Maintainer
///
/// Scan a Minecraft mods folder, work out the CurseForge page of every mod and
/// list the files available there.
///
/// CurseForge answers automated requests with 403 from time to time. When that
/// happens the whole batch is requested again after --retry-delay seconds.
///
/// Examples:
///   mvm check                          # Check the default mods folder
///   mvm --mods-dir ./mods scan         # Show how filenames map to slugs
///   mvm check --json > report.json     # Machine-readable report
#[derive(Parser, Debug)]
#[command(author, version = env!("MVM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Mods directory (defaults to the launcher's .minecraft/mods; also via MVM_MODS_DIR)
    #[arg(
        long = "mods-dir",
        short = 'd',
        env = "MVM_MODS_DIR",
        value_name = "PATH",
        global = true
    )]
    pub mods_dir: Option<PathBuf>,

    /// Catalog base URL; pages are fetched from <URL>/<slug>/files
    #[arg(
        long = "catalog-url",
        env = "MVM_CATALOG_URL",
        value_name = "URL",
        default_value = DEFAULT_CATALOG_URL,
        global = true
    )]
    pub catalog_url: String,

    /// Alias table: a URL or a local JSON file mapping generated slugs to catalog slugs
    #[arg(long, env = "MVM_ALIASES", value_name = "URL|PATH", global = true)]
    pub aliases: Option<TableSource>,

    /// Outlier table: a URL or a local JSON file mapping slugs to reference URLs
    #[arg(long, env = "MVM_OUTLIERS", value_name = "URL|PATH", global = true)]
    pub outliers: Option<TableSource>,

    /// Version manifest URL
    #[arg(
        long = "versions-url",
        value_name = "URL",
        default_value = DEFAULT_VERSION_MANIFEST_URL,
        global = true
    )]
    pub versions_url: String,

    /// Seconds to wait before requesting a blocked batch again
    #[arg(long = "retry-delay", value_name = "SECONDS", default_value_t = 3, global = true)]
    pub retry_delay: u64,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Give up after this many passes if requests are still blocked (default: never)
    #[arg(long = "max-passes", value_name = "N", global = true)]
    pub max_passes: Option<usize>,

    /// Glob selecting mod archives in the mods directory
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_ARCHIVE_PATTERN, global = true)]
    pub pattern: String,

    /// Mod platform (fabric or forge) when it cannot be told from the filenames
    #[arg(long, value_name = "PLATFORM", global = true)]
    pub platform: Option<Platform>,

    /// Minecraft version when it cannot be told from the filenames
    #[arg(long = "game-version", value_name = "VERSION", global = true)]
    pub game_version: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Look every installed mod up on the catalog
    Check(OutputArgs),

    /// List installed mods and their slugs without going online
    Scan(OutputArgs),
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            mods_dir: self.mods_dir.clone(),
            catalog_url: self.catalog_url.clone(),
            aliases: self.aliases.clone().unwrap_or_default(),
            outliers: self.outliers.clone().unwrap_or_default(),
            versions_url: self.versions_url.clone(),
            retry_delay: Duration::from_secs(self.retry_delay),
            timeout: Duration::from_secs(self.timeout),
            max_passes: self.max_passes,
            archive_pattern: self.pattern.clone(),
            platform: self.platform,
            game_version: self.game_version.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = mvm::runtime::RealRuntime;
    let settings = cli.settings();

    match cli.command {
        Commands::Check(args) => commands::check(runtime, settings, args.json).await?,
        Commands::Scan(args) => commands::scan(runtime, settings, args.json).await?,
    }
    Ok(())
}
