use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub department: String,
    pub matric_number: String,
    pub email: String,
    pub whatsapp_number: String,
    pub course: String,
    #[sea_orm(column_type = "Text")]
    pub receipt_url: String,
    pub created_seconds: i64,
    pub created_nanos: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
