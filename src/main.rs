//! Finance Client - command line entry point.
//!
//! A thin command line front end over the `finance_client` library. It logs
//! in against the finance tracker API, keeps the tokens in a local file and
//! manages transactions, transaction types and categories.
//!
//! # Startup Flow
//!
//! 1. Initialize logging (`RUST_LOG`, defaults to "info")
//! 2. Load configuration from environment variables
//! 3. Open the token file and build the authenticated client
//! 4. Run the requested command and print the result as JSON

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use finance_client::{
    client::{ApiClient, LogRedirect},
    config::Config,
    ledger::TransactionLedger,
    models::{
        CategoryParams, CreateTransactionRequest, LoginRequest, PaginationParams, RegisterRequest,
        UpdateTransactionRequest,
    },
    services::{auth_service, trans_category_service, trans_type_service, transaction_service},
    session::Session,
    storage::FileTokenStore,
};

#[derive(Debug, Parser)]
#[command(name = "finance-client", version, about = "Personal finance tracker client")]
struct Cli {
    /// Override FINANCE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a captcha to solve before login or register
    Captcha,
    /// Log in and store the tokens
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[command(flatten)]
        captcha: CaptchaAnswer,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        captcha: CaptchaAnswer,
    },
    /// End this session
    Logout,
    /// End every session of the current user
    LogoutAll,
    /// Report whether an access token is stored
    Status,
    /// Manage transactions
    #[command(subcommand)]
    Transactions(TransactionCommand),
    /// Manage transaction types
    #[command(subcommand)]
    Types(NamedCommand),
    /// Manage transaction categories
    #[command(subcommand)]
    Categories(NamedCommand),
}

#[derive(Debug, Args)]
struct CaptchaAnswer {
    #[arg(long)]
    captcha_id: String,
    #[arg(long)]
    captcha_text: String,
}

#[derive(Debug, Args)]
struct PageArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<PageArgs> for PaginationParams {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page,
            limit: args.limit,
        }
    }
}

#[derive(Debug, Subcommand)]
enum TransactionCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        type_id: String,
        #[arg(long)]
        category_id: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        type_id: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

/// Commands shared by types and categories.
#[derive(Debug, Subcommand)]
enum NamedCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Only categories of this type (ignored for types)
        #[arg(long)]
        type_id: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        name: String,
    },
    Update {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let store = Arc::new(FileTokenStore::new(&config.token_file));
    let client = ApiClient::from_config(&config, store, Arc::new(LogRedirect))?;

    match cli.command {
        Command::Captcha => print_json(&auth_service::generate_captcha(&client).await?)?,
        Command::Login {
            email,
            password,
            captcha,
        } => {
            let mut session = Session::new(client);
            let user = session
                .login(&LoginRequest {
                    email,
                    password,
                    captcha_id: captcha.captcha_id,
                    captcha_text: captcha.captcha_text,
                })
                .await;
            print_captcha_hint(&session);
            print_json(&user?)?;
        }
        Command::Register {
            email,
            password,
            name,
            captcha,
        } => {
            let mut session = Session::new(client);
            let user = session
                .register(&RegisterRequest {
                    email,
                    password,
                    name,
                    captcha_id: captcha.captcha_id,
                    captcha_text: captcha.captcha_text,
                })
                .await;
            print_captcha_hint(&session);
            print_json(&user?)?;
            tracing::info!("Registered, log in to continue");
        }
        Command::Logout => Session::new(client).logout().await,
        Command::LogoutAll => Session::new(client).logout_all().await,
        Command::Status => {
            let logged_in = Session::new(client).check_auth()?;
            println!("{}", if logged_in { "logged in" } else { "logged out" });
        }
        Command::Transactions(command) => run_transactions(client, command).await?,
        Command::Types(command) => run_types(&client, command).await?,
        Command::Categories(command) => run_categories(&client, command).await?,
    }

    Ok(())
}

/// After a failed login or register the session holds a fresh captcha.
fn print_captcha_hint(session: &Session) {
    if let (Some(error), Some(captcha)) = (session.error(), session.captcha()) {
        eprintln!("{error}");
        eprintln!("New captcha id: {}", captcha.captcha_id);
        eprintln!("{}", captcha.image_base64);
    }
}

async fn run_transactions(client: ApiClient, command: TransactionCommand) -> anyhow::Result<()> {
    let mut ledger = TransactionLedger::new(client.clone());

    match command {
        TransactionCommand::List { page } => {
            let page = transaction_service::list(&client, &page.into()).await?;
            print_json(&page.data)?;
            eprintln!(
                "page {}/{} ({} total)",
                page.meta.page, page.meta.total_pages, page.meta.total
            );
        }
        TransactionCommand::Get { id } => print_json(ledger.fetch_transaction(&id).await?)?,
        TransactionCommand::Create {
            amount,
            type_id,
            category_id,
            date,
            description,
        } => {
            let request = CreateTransactionRequest {
                amount,
                type_id,
                category_id,
                date,
                description,
            };
            print_json(&ledger.create_transaction(&request).await?)?;
        }
        TransactionCommand::Update {
            id,
            amount,
            type_id,
            category_id,
            date,
            description,
        } => {
            let request = UpdateTransactionRequest {
                amount,
                type_id,
                category_id,
                date,
                description,
            };
            if request.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }
            print_json(&ledger.update_transaction(&id, &request).await?)?;
        }
        TransactionCommand::Delete { id } => {
            ledger.delete_transaction(&id).await?;
            tracing::info!(%id, "Transaction deleted");
        }
    }

    Ok(())
}

async fn run_types(client: &ApiClient, command: NamedCommand) -> anyhow::Result<()> {
    match command {
        NamedCommand::List { page, .. } => {
            print_json(&trans_type_service::list(client, &page.into()).await?.data)?
        }
        NamedCommand::Get { id } => print_json(&trans_type_service::get(client, &id).await?)?,
        NamedCommand::Create { name } => {
            print_json(&trans_type_service::create(client, &name).await?)?
        }
        NamedCommand::Update { id, name } => {
            print_json(&trans_type_service::update(client, &id, &name).await?)?
        }
        NamedCommand::Delete { id } => trans_type_service::delete(client, &id).await?,
    }
    Ok(())
}

async fn run_categories(client: &ApiClient, command: NamedCommand) -> anyhow::Result<()> {
    match command {
        NamedCommand::List { page, type_id } => {
            let params = CategoryParams {
                pagination: page.into(),
                type_id,
            };
            print_json(&trans_category_service::list(client, &params).await?.data)?
        }
        NamedCommand::Get { id } => print_json(&trans_category_service::get(client, &id).await?)?,
        NamedCommand::Create { name } => {
            print_json(&trans_category_service::create(client, &name).await?)?
        }
        NamedCommand::Update { id, name } => {
            print_json(&trans_category_service::update(client, &id, &name).await?)?
        }
        NamedCommand::Delete { id } => trans_category_service::delete(client, &id).await?,
    }
    Ok(())
}
