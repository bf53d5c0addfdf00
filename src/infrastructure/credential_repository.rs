use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    domain::{
        error::RepositoryError,
        models::admin::{Admin, AdminCredential, HashedPassword},
        repositories::credential_repository::CredentialRepository,
    },
    infrastructure::{database::map_db_err, entity::admins},
};

#[derive(Clone)]
pub struct MysqlCredentialRepository {
    db: DatabaseConnection,
}

impl MysqlCredentialRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for MysqlCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminCredential>, RepositoryError> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(admin.map(|model| {
            AdminCredential::reconstruct(
                Admin::new(model.id, model.email),
                HashedPassword::new(model.password_hash),
            )
        }))
    }

    async fn create_admin(
        &self,
        email: &str,
        password_hash: HashedPassword,
    ) -> Result<Admin, RepositoryError> {
        let id = Uuid::new_v4();
        let admin = admins::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.as_str().to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        admins::Entity::insert(admin)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Admin::new(id, email.to_string()))
    }
}
