//! CLI for issuing caller tokens
//!
//! Looks up the identity's claims and prints a signed token for the callable
//! endpoints. With `--create` the identity is provisioned first.

use std::env;

use anyhow::{Context, Result};
use clap::Parser;
use functions_core::common::UserId;
use functions_core::config::jwt_issuer_or_default;
use functions_core::domains::auth::JwtService;
use functions_core::kernel::{BaseIdentityStore, Identity, IdentityClaims, PostgresIdentityStore};
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "issue_token")]
#[command(about = "Issue a caller token for a user")]
struct Cli {
    /// Uid of the caller
    uid: String,

    /// Provision the identity before issuing the token
    #[arg(long)]
    create: bool,

    /// Email for a created identity
    #[arg(long, requires = "create")]
    email: Option<String>,

    /// Grant the admin claim to a created identity
    #[arg(long, requires = "create")]
    admin: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let jwt_issuer = jwt_issuer_or_default(env::var("JWT_ISSUER").ok());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let identities = PostgresIdentityStore::new(pool);

    let uid = UserId::new(cli.uid);
    if uid.is_blank() {
        anyhow::bail!("uid must not be blank");
    }

    if cli.create {
        identities
            .create_identity(Identity {
                uid: uid.clone(),
                email: cli.email,
                display_name: None,
                photo_url: None,
                custom_claims: IdentityClaims { admin: cli.admin },
            })
            .await
            .context("Failed to create identity")?;
        eprintln!("Created identity {}", uid);
    } else if identities.get_identity(&uid).await?.is_none() {
        anyhow::bail!("Unknown identity {} (use --create to provision it)", uid);
    }

    let claims = identities
        .get_claims(&uid)
        .await
        .context("Failed to read identity claims")?;

    let token = JwtService::new(&jwt_secret, jwt_issuer).create_token(&uid, claims.admin)?;
    println!("{}", token);

    Ok(())
}
