use sea_orm::entity::prelude::*;

/// One recorded page view. Rows are insert-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub recorded_at: String,
    pub path: String,
    pub device_type: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    pub user_id: Option<i32>,
    pub session_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
