//! Agrimart administration CLI

use std::process;

use agrimart_app::{
    auth::PgAuthService,
    database,
    domain::users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
};
use clap::{Args, Parser, Subcommand};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "agrimart-app", about = "Agrimart administration CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage users
    User(UserCommand),

    /// Manage API tokens
    Token(TokenCommand),

    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Create a user and issue their first API token
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    /// Issue another API token for an existing user
    Issue(IssueTokenArgs),
}

#[derive(Debug, Args)]
struct IssueTokenArgs {
    /// User the token authenticates as
    #[arg(long)]
    user: Uuid,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let pool = connect(cli.database_url.as_deref()).await?;

    match cli.command {
        Commands::User(UserCommand {
            command: UserSubcommand::Create(args),
        }) => create_user(pool, args).await,
        Commands::Token(TokenCommand {
            command: TokenSubcommand::Issue(args),
        }) => issue_token(pool, UserUuid::from_uuid(args.user)).await,
        Commands::Migrate => {
            database::migrate(&pool)
                .await
                .map_err(|error| format!("failed to apply migrations: {error}"))?;

            println!("migrations applied");

            Ok(())
        }
    }
}

async fn connect(database_url: Option<&str>) -> Result<PgPool, String> {
    let database_url = database_url.ok_or("DATABASE_URL is not set")?;

    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

async fn create_user(pool: PgPool, args: CreateUserArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let user = PgUsersService::new(pool.clone())
        .create_user(NewUser {
            uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);

    issue_token(pool, user.uuid).await
}

async fn issue_token(pool: PgPool, user: UserUuid) -> Result<(), String> {
    let issued = PgAuthService::new(pool)
        .issue_api_token(user)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
