use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::config::{AppConfig, DatabaseConfig};

pub fn connect_options(database: &DatabaseConfig) -> anyhow::Result<PgConnectOptions> {
    let options = match database {
        DatabaseConfig::Url(url) => {
            PgConnectOptions::from_str(url).context("parse DATABASE_URL")?
        }
        DatabaseConfig::Parts {
            user,
            password,
            host,
            port,
            name,
        } => PgConnectOptions::new()
            .username(user)
            .password(password)
            .host(host)
            .port(*port)
            .database(name),
    };
    Ok(options)
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options(&config.database)?)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Applies the embedded migrations. A failure is logged and startup continues,
/// the schema may be managed outside this service.
pub async fn migrate(db: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(db).await {
        tracing::warn!(error = %e, "migration failed; continuing with existing schema");
    }
}
