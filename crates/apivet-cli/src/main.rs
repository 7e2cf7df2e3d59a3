//! apivet CLI - find deprecated Kubernetes apiVersions before an upgrade removes them

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

use apivet_core::OutputFormat;

mod commands;
mod error;
mod exit_codes;
mod finder;

#[derive(Parser)]
#[command(name = "apivet")]
#[command(author = "apivet Contributors")]
#[command(version)]
#[command(about = "Find deprecated and removed Kubernetes apiVersions", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output format: normal, wide, custom, markdown, csv, json or yaml
    #[arg(short, long, global = true, default_value = "normal", env = "APIVET_OUTPUT")]
    pub output: OutputFormat,

    /// Columns shown by the custom, markdown and csv formats
    #[arg(long, global = true, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Target versions as component=version, e.g. k8s=v1.22.0
    #[arg(
        short = 't',
        long = "target-versions",
        global = true,
        value_delimiter = ',',
        env = "APIVET_TARGET_VERSIONS"
    )]
    pub target_versions: Vec<String>,

    /// Extra rules file appended to the bundled catalog
    #[arg(
        short = 'f',
        long = "additional-versions",
        global = true,
        env = "APIVET_ADDITIONAL_VERSIONS"
    )]
    pub additional_versions: Option<PathBuf>,

    /// Components to report on (default: every component with a target version)
    #[arg(long, global = true, value_delimiter = ',', env = "APIVET_COMPONENTS")]
    pub components: Vec<String>,

    /// Do not exit non-zero because of deprecated apiVersions
    #[arg(long, global = true)]
    pub ignore_deprecations: bool,

    /// Do not exit non-zero because of removed apiVersions
    #[arg(long, global = true)]
    pub ignore_removals: bool,

    /// Do not exit non-zero because a replacement is not available yet
    #[arg(long, global = true)]
    pub ignore_unavailable_replacements: bool,

    /// Only report apiVersions that are removed in the target versions
    #[arg(short = 'r', long, global = true)]
    pub only_show_removed: bool,

    /// Omit the header row
    #[arg(short = 'H', long, global = true)]
    pub no_headers: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where Helm keeps its releases
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum HelmStore {
    #[default]
    Secrets,
    Configmaps,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single file, or stdin with `-`
    Detect {
        /// File to check
        file: String,
    },

    /// Check every file under a directory
    DetectFiles {
        /// Directory to walk (default: current directory)
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },

    /// Check the rendered manifests of deployed Helm releases
    DetectHelm {
        /// Only look at releases in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Kubeconfig context to use
        #[arg(long, env = "APIVET_KUBE_CONTEXT")]
        kube_context: Option<String>,

        /// Helm storage driver
        #[arg(long, value_enum, default_value_t)]
        helm_store: HelmStore,
    },

    /// Check the last-applied configuration of objects in the cluster
    DetectApiResources {
        /// Only look at objects in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Kubeconfig context to use
        #[arg(long, env = "APIVET_KUBE_CONTEXT")]
        kube_context: Option<String>,
    },

    /// Run detect-helm and detect-api-resources together
    DetectAllInCluster {
        /// Only look at this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Kubeconfig context to use
        #[arg(long, env = "APIVET_KUBE_CONTEXT")]
        kube_context: Option<String>,

        /// Helm storage driver
        #[arg(long, value_enum, default_value_t)]
        helm_store: HelmStore,
    },

    /// Print the apiVersions apivet knows about
    ListVersions,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> error::Result<apivet_core::Outcome> {
    let global = &cli.global;
    match cli.command {
        Commands::Detect { file } => commands::detect::run(global, &file),

        Commands::DetectFiles { directory } => {
            commands::detect_files::run(global, directory.as_deref())
        }

        Commands::DetectHelm {
            namespace,
            kube_context,
            helm_store,
        } => {
            commands::detect_helm::run(
                global,
                namespace.as_deref(),
                kube_context.as_deref(),
                helm_store,
            )
            .await
        }

        Commands::DetectApiResources {
            namespace,
            kube_context,
        } => {
            commands::detect_api_resources::run(
                global,
                namespace.as_deref(),
                kube_context.as_deref(),
            )
            .await
        }

        Commands::DetectAllInCluster {
            namespace,
            kube_context,
            helm_store,
        } => {
            commands::detect_all_in_cluster::run(
                global,
                namespace.as_deref(),
                kube_context.as_deref(),
                helm_store,
            )
            .await
        }

        Commands::ListVersions => commands::list_versions::run(global),
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(outcome) => std::process::exit(exit_codes::for_outcome(outcome)),
        Err(err) if err.exit_code() == exit_codes::ERROR => Err(err.into()),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code)
        }
    }
}
