use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use smart_pantry::api::{FoodApi, PantryApi};
use smart_pantry::guard::{self, GuardDecision, Route};
use smart_pantry::models::{self, Credential, FoodItem, NewFoodItem, NewPantryItem, PantryItem, parse_iso_date};
use smart_pantry::monitor::check_auth;
use smart_pantry::notice::notice_for_event;
use smart_pantry::{ApiClient, ApiError, ClientConfig, ConfigError, SessionEvent};
use time::Date;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{} [{}]", .0.user_message(), .0.error_code())]
    Api(#[from] ApiError),
    #[error("not logged in; run `smart-pantry login` first")]
    NotAuthenticated,
    #[error("no pantry item with id {0}")]
    PantryItemNotFound(u64),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "smart-pantry", about = "Smart Pantry API client")]
struct Cli {
    #[arg(long, env = "PANTRY_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "PANTRY_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the access token.
    Login(CredentialArgs),
    /// Create an account.
    Signup(CredentialArgs),
    Logout,
    /// Check the stored token against the server.
    Verify,
    /// Show local session state after a verification round trip.
    Status,
    Food(FoodCommand),
    Pantry(PantryCommand),
    Recipes(RecipeCommand),
}

#[derive(Args, Debug)]
struct CredentialArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "PANTRY_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct FoodCommand {
    #[command(subcommand)]
    command: FoodSubcommand,
}

#[derive(Subcommand, Debug)]
enum FoodSubcommand {
    List,
    Get {
        id: u64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        #[arg(long, value_parser = parse_iso_date, help = "Expiry date, YYYY-MM-DD")]
        expiry: Date,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long, value_parser = parse_iso_date)]
        expiry: Option<Date>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
struct PantryCommand {
    #[command(subcommand)]
    command: PantrySubcommand,
}

#[derive(Subcommand, Debug)]
enum PantrySubcommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        #[arg(long, value_parser = parse_iso_date, help = "Expiry date, YYYY-MM-DD")]
        expiry: Date,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long, value_parser = parse_iso_date)]
        expiry: Option<Date>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
struct RecipeCommand {
    #[command(subcommand)]
    command: RecipeSubcommand,
}

#[derive(Subcommand, Debug)]
enum RecipeSubcommand {
    /// Suggest a recipe from everything stored.
    Suggest,
    /// Suggest a recipe from the given ingredients.
    Generate {
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_base_url(api_url)?;
    }
    if let Some(token_file) = cli.token_file {
        config = config.with_token_file(token_file);
    }

    let client = ApiClient::from_config(&config)?;
    let mut events = client.events().subscribe();
    let result = run(&client, cli.command).await;
    report_events(&mut events);
    result
}

async fn run(client: &ApiClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login(args) => {
            let next = client.auth().login(&Credential::new(args.email, args.password)).await?;
            print_json(&json!({ "authenticated": true, "next": next.path() }))
        }
        Command::Signup(args) => {
            let created = client.auth().register(&Credential::new(args.email, args.password)).await?;
            print_json(&created)
        }
        Command::Logout => {
            client.auth().logout().await?;
            print_json(&json!({ "authenticated": false }))
        }
        Command::Verify => {
            let body = client.auth().verify().await?;
            print_json(&body)
        }
        Command::Status => {
            let snapshot = check_auth(client).await;
            print_json(&json!({
                "api_url": client.base_url(),
                "has_token": snapshot.access_token.is_some(),
                "authenticated": snapshot.is_authenticated,
            }))
        }
        Command::Food(food) => {
            require_session(client, Route::FoodItems).await?;
            run_food(client.food(), food.command).await
        }
        Command::Pantry(pantry) => {
            require_session(client, Route::Pantry).await?;
            run_pantry(client.pantry(), pantry.command).await
        }
        Command::Recipes(recipes) => {
            require_session(client, Route::Recipes).await?;
            let suggestion = match recipes.command {
                RecipeSubcommand::Suggest => client.recipes().suggestions().await?,
                RecipeSubcommand::Generate { ingredients } => client.recipes().generate(&ingredients).await?,
            };
            print_json(&serde_json::to_value(suggestion)?)
        }
    }
}

async fn run_food(api: FoodApi<'_>, command: FoodSubcommand) -> Result<(), CliError> {
    match command {
        FoodSubcommand::List => {
            let today = models::today();
            let rows = api
                .list()
                .await?
                .iter()
                .map(|item| with_status(item, item.expiry_status(today)))
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&Value::Array(rows))
        }
        FoodSubcommand::Get { id } => {
            let item = api.get(id).await?;
            print_json(&with_status(&item, item.expiry_status(models::today()))?)
        }
        FoodSubcommand::Create { title, quantity, expiry } => {
            let created = api.create(&NewFoodItem { title, quantity, expiry_date: expiry }).await?;
            print_json(&serde_json::to_value(created)?)
        }
        FoodSubcommand::Update { id, title, quantity, expiry } => {
            let current = api.get(id).await?;
            let updated = FoodItem {
                title: title.unwrap_or(current.title),
                quantity: quantity.unwrap_or(current.quantity),
                expiry_date: expiry.unwrap_or(current.expiry_date),
                ..current
            };
            let saved = api.update(&updated).await?;
            print_json(&serde_json::to_value(saved)?)
        }
        FoodSubcommand::Delete { id } => {
            api.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

async fn run_pantry(api: PantryApi<'_>, command: PantrySubcommand) -> Result<(), CliError> {
    match command {
        PantrySubcommand::List => {
            let today = models::today();
            let rows = api
                .list()
                .await?
                .iter()
                .map(|item| with_status(item, item.expiry_status(today)))
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&Value::Array(rows))
        }
        PantrySubcommand::Create { name, quantity, expiry } => {
            let created = api.create(&NewPantryItem { name, quantity, expiry_date: expiry }).await?;
            print_json(&serde_json::to_value(created)?)
        }
        PantrySubcommand::Update { id, name, quantity, expiry } => {
            let current = api
                .list()
                .await?
                .into_iter()
                .find(|item| item.id == id)
                .ok_or(CliError::PantryItemNotFound(id))?;
            let updated = PantryItem {
                name: name.unwrap_or(current.name),
                quantity: quantity.unwrap_or(current.quantity),
                expiry_date: expiry.unwrap_or(current.expiry_date),
                ..current
            };
            let saved = api.update(&updated).await?;
            print_json(&serde_json::to_value(saved)?)
        }
        PantrySubcommand::Delete { id } => {
            api.delete(id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

/// Verify the stored session and apply the route guard before a protected
/// command runs.
async fn require_session(client: &ApiClient, route: Route) -> Result<(), CliError> {
    let snapshot = check_auth(client).await;
    match guard::guard(route, &snapshot) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Wait | GuardDecision::Redirect(_) => Err(CliError::NotAuthenticated),
    }
}

fn with_status<T: Serialize>(item: &T, status: models::ExpiryStatus) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(item)?;
    if let Value::Object(map) = &mut value {
        map.insert("expiry_status".to_owned(), serde_json::to_value(status)?);
    }
    Ok(value)
}

/// Print notices for signals published while the command ran.
fn report_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if let Some(notice) = notice_for_event(&event) {
            eprintln!("{}", notice.text);
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
