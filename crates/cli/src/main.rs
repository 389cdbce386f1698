//! Catalogix CLI - drive the catalog backend from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List users
//! catalogix users list
//!
//! # Register a user (password may also come from CATALOGIX_USER_PASSWORD)
//! catalogix users register -n "Alice" -e alice@example.com -p 's3cret'
//!
//! # List, create and delete products as user 1
//! catalogix products list --user 1
//! catalogix products create --user 1 -n Pen -p 10
//! catalogix products delete 9 --user 1 --yes
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOGIX_API_BASE_URL` - Catalog backend origin
//! - `CATALOGIX_USERS_URL` / `CATALOGIX_PRODUCTS_URL` - Per-service overrides
//! - `CATALOGIX_USER_ID` - Default identity for product commands
//! - `CATALOGIX_CURRENCY_SYMBOL` - Symbol prefixed to prices

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalogix_core::{ProductId, UserId};
use catalogix_frontend::api::{ApiClient, ApiEndpoints};
use clap::{Args, Parser, Subcommand};
use url::Url;

mod commands;

use commands::CliError;

#[derive(Debug, Parser)]
#[command(name = "catalogix")]
#[command(author, version, about = "Catalogix catalog backend client")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct BackendArgs {
    /// Catalog backend origin
    #[arg(
        long,
        global = true,
        env = "CATALOGIX_API_BASE_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    api_url: Url,

    /// User service base URL (defaults to --api-url)
    #[arg(long, global = true, env = "CATALOGIX_USERS_URL")]
    users_url: Option<Url>,

    /// Product service base URL (defaults to --api-url)
    #[arg(long, global = true, env = "CATALOGIX_PRODUCTS_URL")]
    products_url: Option<Url>,

    /// Currency symbol prefixed to prices
    #[arg(long, global = true, env = "CATALOGIX_CURRENCY_SYMBOL", default_value = "₹")]
    currency: String,
}

impl BackendArgs {
    fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints {
            users: self.users_url.clone().unwrap_or_else(|| self.api_url.clone()),
            products: self
                .products_url
                .clone()
                .unwrap_or_else(|| self.api_url.clone()),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage the products of one user
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// List all users
    List,
    /// Register a new user
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "CATALOGIX_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete a user
    Delete {
        id: UserId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ProductAction {
    /// List the user's products
    List {
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Create a product for the user
    Create {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Price, strictly positive
        #[arg(short, long)]
        price: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete one of the user's products
    Delete {
        id: ProductId,

        #[command(flatten)]
        identity: IdentityArgs,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct IdentityArgs {
    /// Act as this user (sent as X-USER-ID)
    #[arg(short, long = "user", env = "CATALOGIX_USER_ID")]
    user: Option<UserId>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalogix_cli=info,catalogix_frontend=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = ApiClient::new(cli.backend.endpoints());
    let currency = cli.backend.currency.as_str();

    match cli.command {
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(&client).await?,
            UserAction::Register {
                name,
                email,
                password,
            } => commands::users::register(&client, &name, &email, password).await?,
            UserAction::Delete { id, yes } => commands::users::delete(&client, id, yes).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::List { identity } => {
                commands::products::list(&client, identity.user, currency).await?;
            }
            ProductAction::Create {
                identity,
                name,
                price,
                description,
            } => {
                commands::products::create(
                    &client,
                    identity.user,
                    &name,
                    &price,
                    description.as_deref(),
                    currency,
                )
                .await?;
            }
            ProductAction::Delete { id, identity, yes } => {
                commands::products::delete(&client, id, identity.user, yes).await?;
            }
        },
    }
    Ok(())
}
