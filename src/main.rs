use anyhow::Result;
use clap::Parser;
use log::debug;
use mmpm_console::{
    commands::{self, Action, Collection, ListOptions, Services},
    config::Config,
    registration::{Field, RegistrationForm},
    table::SortColumn,
};

/// mmpm-console - MagicMirror Package Manager console
///
/// Browse, install, remove and upgrade MagicMirror packages through a running
/// MMPM backend.
///
/// If the MMPM_TOKEN environment variable is set, it will be sent as a bearer
/// token with every request.
///
/// Examples:
///   mmpm-console list marketplace --filter weather
///   mmpm-console install MMM-Clock
#[derive(Parser, Debug)]
#[command(author, version = env!("MMPM_CONSOLE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// MMPM backend URL (defaults to http://localhost:7891)
    #[arg(long = "api-url", env = "MMPM_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the MMPM backend
    #[arg(long, env = "MMPM_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Answer every prompt with its default
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Show debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List a package collection
    List(ListArgs),

    /// Show the MagicMirror environment reported by the backend
    Env,

    /// Install packages from the marketplace
    Install(TitlesArgs),

    /// Remove installed packages
    Uninstall(TitlesArgs),

    /// Upgrade installed packages
    Upgrade(TitlesArgs),

    /// Re-download the package database
    Refresh,

    /// Register an external package source
    AddSource(AddSourceArgs),

    /// Remove external package sources
    RemoveSource(TitlesArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(value_enum, default_value_t = Collection::Marketplace)]
    pub collection: Collection,

    /// Sort by category, title, description or author
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<SortColumn>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Only show packages containing this text
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = mmpm_console::table::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(clap::Args, Debug)]
pub struct TitlesArgs {
    /// Package titles
    #[arg(value_name = "TITLE", required = true)]
    pub titles: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct AddSourceArgs {
    #[arg(long)]
    pub title: String,

    /// Git repository URL
    #[arg(long)]
    pub repository: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub description: String,
}

impl AddSourceArgs {
    fn to_form(&self) -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.set(Field::Title, self.title.trim());
        form.set(Field::Repository, self.repository.trim());
        form.set(Field::Author, self.author.trim());
        form.set(Field::Description, self.description.trim());
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::new(cli.api_url.clone(), cli.token.clone());
    debug!("Using backend {}", config.api_url);

    let registration = match &cli.command {
        Commands::AddSource(args) => args.to_form(),
        _ => RegistrationForm::new(),
    };
    let services = Services::new(&config, registration, !cli.yes)?;

    match cli.command {
        Commands::List(args) => {
            let options = ListOptions {
                sort: args.sort,
                descending: args.desc,
                filter: args.filter,
                page: args.page,
                page_size: args.page_size,
            };
            commands::list(&services, args.collection, &options).await?
        }
        Commands::Env => commands::env(&services).await?,
        Commands::Install(args) => {
            commands::run_on_titles(&services, Action::Install, &args.titles).await?
        }
        Commands::Uninstall(args) => {
            commands::run_on_titles(&services, Action::Uninstall, &args.titles).await?
        }
        Commands::Upgrade(args) => {
            commands::run_on_titles(&services, Action::Upgrade, &args.titles).await?
        }
        Commands::Refresh => commands::refresh(&services).await?,
        Commands::AddSource(_) => commands::add_source(&services).await?,
        Commands::RemoveSource(args) => {
            commands::run_on_titles(&services, Action::RemoveSource, &args.titles).await?
        }
    }
    Ok(())
}
