use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::{
    config::Config,
    domain::error::RepositoryError,
    infrastructure::entity::{admins, registrations},
};

pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// Create the tables if they are missing
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut registrations_table = schema.create_table_from_entity(registrations::Entity);
    registrations_table.if_not_exists();
    db.execute(backend.build(&registrations_table)).await?;

    let mut admins_table = schema.create_table_from_entity(admins::Entity);
    admins_table.if_not_exists();
    db.execute(backend.build(&admins_table)).await?;

    info!("database schema ready");
    Ok(())
}

/// MySQL access-denied errors (1044, 1045, 1142, 1143) are told apart from
/// the rest so callers can report them as permission failures.
pub fn map_db_err(error: DbErr) -> RepositoryError {
    let message = error.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("access denied") || lowered.contains("command denied") {
        RepositoryError::PermissionDenied(message)
    } else {
        RepositoryError::DatabaseError(message)
    }
}
