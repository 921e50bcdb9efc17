use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use nuget_client::client::{ApiVersion, PackageSearch, create_client};
use nuget_client::config::{ClientConfig, log_path};
use nuget_client::logging::{self, LogTarget};
use nuget_client::sources::{self, PackageSources};

#[derive(Parser)]
#[command(name = "nuget-client")]
#[command(version, about = "Discover NuGet package ids and versions")]
struct Cli {
    /// Feed URL to query (repeatable); defaults to the sources in NuGet.config
    #[arg(long = "feed", global = true)]
    feeds: Vec<String>,

    /// NuGet.config to read package sources from (defaults to the user-level file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// NuGet API version of the feeds (auto-detected when omitted)
    #[arg(long, global = true, value_enum)]
    api_version: Option<CliApiVersion>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest package ids that complete a partial id
    Suggest {
        partial_id: String,
        #[arg(long)]
        take: Option<usize>,
    },
    /// List the available versions of a package
    Versions {
        package_id: String,
        #[arg(long)]
        take: Option<usize>,
    },
    /// Print the configured package sources
    Sources,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliApiVersion {
    V2,
    V3,
}

impl From<CliApiVersion> for ApiVersion {
    fn from(value: CliApiVersion) -> Self {
        match value {
            CliApiVersion::V2 => ApiVersion::V2,
            CliApiVersion::V3 => ApiVersion::V3,
        }
    }
}

fn load_package_sources(config: Option<PathBuf>) -> anyhow::Result<PackageSources> {
    let path = match config {
        Some(path) => Some(path),
        None => sources::user_config_file()?,
    };

    match path {
        Some(path) => Ok(sources::get_configured_package_sources(&path)?),
        None => Ok(PackageSources::new()),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Sources = cli.command {
        for (name, value) in load_package_sources(cli.config)? {
            println!("{}\t{}", name, value);
        }
        return Ok(());
    }

    let feeds = if cli.feeds.is_empty() {
        sources::feed_urls(&load_package_sources(cli.config)?)
    } else {
        cli.feeds
    };

    let config = ClientConfig {
        request_timeout_ms: cli.timeout_ms,
        ..ClientConfig::default()
    };
    let client = create_client(&feeds, cli.api_version.map(ApiVersion::from), config).await?;

    let results = match cli.command {
        Command::Suggest { partial_id, take } => {
            client.suggest_package_ids(&partial_id, take).await?
        }
        Command::Versions { package_id, take } => {
            client.get_available_package_versions(&package_id, take).await?
        }
        Command::Sources => Vec::new(),
    };

    for result in results {
        println!("{}", result);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = log_path();
    let target = if cli.log_stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(&log_file)
    };
    let _guard = logging::init(target)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
