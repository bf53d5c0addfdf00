use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder};

use crate::{
    domain::{
        error::RepositoryError,
        models::registration::{
            Course, MonotonicClock, NewRegistration, Registration, RegistrationId, Timestamp,
        },
        repositories::registration_repository::RegistrationRepository,
    },
    infrastructure::{database::map_db_err, entity::registrations},
};

#[derive(Clone)]
pub struct MysqlRegistrationRepository {
    db: DatabaseConnection,
    clock: Arc<MonotonicClock>,
}

impl MysqlRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            clock: Arc::new(MonotonicClock::new()),
        }
    }
}

#[async_trait]
impl RegistrationRepository for MysqlRegistrationRepository {
    async fn create(
        &self,
        registration: &NewRegistration,
        receipt_url: &str,
    ) -> Result<Registration, RepositoryError> {
        let id = RegistrationId::new();
        let timestamp = self.clock.now();

        let model = registrations::ActiveModel {
            id: Set(*id.as_uuid()),
            full_name: Set(registration.full_name.clone()),
            department: Set(registration.department.clone()),
            matric_number: Set(registration.matric_number.clone()),
            email: Set(registration.email.clone()),
            whatsapp_number: Set(registration.whatsapp_number.clone()),
            course: Set(registration.course.as_str().to_string()),
            receipt_url: Set(receipt_url.to_string()),
            created_seconds: Set(timestamp.seconds),
            created_nanos: Set(timestamp.nanoseconds),
        };

        registrations::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Registration::new(
            id,
            registration.clone(),
            receipt_url.to_string(),
            timestamp,
        ))
    }

    async fn list_recent(&self) -> Result<Vec<Registration>, RepositoryError> {
        let models = registrations::Entity::find()
            .order_by_desc(registrations::Column::CreatedSeconds)
            .order_by_desc(registrations::Column::CreatedNanos)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError> {
        let result = registrations::Entity::delete_by_id(*id.as_uuid())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn to_domain(model: registrations::Model) -> Result<Registration, RepositoryError> {
    let course = model
        .course
        .parse::<Course>()
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(Registration::new(
        RegistrationId::from_uuid(model.id),
        NewRegistration {
            full_name: model.full_name,
            department: model.department,
            matric_number: model.matric_number,
            email: model.email,
            whatsapp_number: model.whatsapp_number,
            course,
        },
        model.receipt_url,
        Timestamp {
            seconds: model.created_seconds,
            nanoseconds: model.created_nanos,
        },
    ))
}
