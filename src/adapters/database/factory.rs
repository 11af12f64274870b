//! Repository factory
//!
//! Builds the production [`Repositories`] bundle from configuration.

use crate::adapters::database::traits::Repositories;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::config::schema::PostgreSQLConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the PostgreSQL-backed repositories
///
/// All three repositories share one connection pool. The connection is
/// tested before returning so a misconfigured store fails at startup rather
/// than on the first export.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or the connection test fails.
pub async fn create_repositories(config: &PostgreSQLConfig) -> Result<Repositories> {
    let client = PostgreSQLClient::new(config.clone()).await?;

    tracing::info!(
        connection = %client.connection_string_safe(),
        max_connections = config.max_connections,
        "Creating PostgreSQL repositories"
    );

    client.test_connection().await?;

    let store = PostgreSQLStore::new(client);
    Ok(Repositories::from_store(Arc::new(store)))
}
