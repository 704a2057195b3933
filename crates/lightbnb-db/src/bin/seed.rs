//! # Seed Data Loader
//!
//! Applies migrations and fills the database with development fixtures.
//!
//! ## Usage
//! ```bash
//! # Uses DB_HOST / DB_PORT / DB_NAME / DB_USER / DB_PASS
//! cargo run -p lightbnb-db --bin seed
//!
//! # More logging
//! RUST_LOG=lightbnb_db=debug cargo run -p lightbnb-db --bin seed
//! ```
//!
//! ## Fixtures
//! - `seeds/users.json` - users, inserted in file order
//! - `seeds/properties.json` - properties whose `owner_id` is the 1-based
//!   position of the owner in `users.json`

use lightbnb_core::{NewProperty, NewUser, ResultLimit, SearchCriteria};
use lightbnb_db::migrations::migration_status;
use lightbnb_db::{Database, DbConfig, DbError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USERS_JSON: &str = include_str!("../../../../seeds/users.json");
const PROPERTIES_JSON: &str = include_str!("../../../../seeds/properties.json");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    if std::env::args().any(|a| a == "--help" || a == "-h") {
        println!("LightBnB Seed Data Loader");
        println!();
        println!("Usage: seed");
        println!();
        println!("Reads DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASS from the environment.");
        return Ok(());
    }

    let users: Vec<NewUser> = serde_json::from_str(USERS_JSON)?;
    let properties: Vec<NewProperty> = serde_json::from_str(PROPERTIES_JSON)?;

    let config = DbConfig::from_env()?.run_migrations(true);
    let db = match Database::new(config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Could not open database");
            return Err(e.into());
        }
    };

    let (total, applied) = migration_status(db.pool()).await?;
    info!(total, applied, "Migration status");

    let existing = db.properties().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has properties, skipping seed");
        return Ok(());
    }

    let mut user_ids = Vec::with_capacity(users.len());
    for user in &users {
        let id = match db.users().insert(user).await {
            Ok(stored) => stored.id,
            Err(DbError::UniqueViolation { .. }) => {
                // Left over from an earlier partial run.
                match db.users().get_by_email(&user.email).await? {
                    Some(stored) => stored.id,
                    None => return Err(DbError::not_found("User", &user.email).into()),
                }
            }
            Err(e) => return Err(e.into()),
        };
        user_ids.push(id);
    }
    info!(count = user_ids.len(), "Users seeded");

    let mut inserted = 0;
    for mut property in properties {
        let owner_index = usize::try_from(property.owner_id - 1).ok();
        let Some(&owner_id) = owner_index.and_then(|i| user_ids.get(i)) else {
            warn!(title = %property.title, owner = property.owner_id, "Unknown owner, skipping");
            continue;
        };
        property.owner_id = owner_id;

        db.properties().insert(&property).await?;
        inserted += 1;
    }
    info!(count = inserted, "Properties seeded");

    let sample = SearchCriteria::default().city("Vancouver");
    let listings = db.properties().search(&sample, ResultLimit::default()).await?;
    info!(matches = listings.len(), "Search 'Vancouver'");

    db.close().await;
    info!("Seed complete");
    Ok(())
}
