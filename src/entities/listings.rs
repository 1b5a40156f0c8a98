use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub seller_id: i32,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub purchase_year: i32,
    pub price: i64,
    pub gear_transmission: String,
    pub frame_material: String,
    pub suspension: String,
    pub condition: String,
    pub cycle_type: String,
    pub wheel_size: String,
    pub has_receipt: bool,
    pub additional_details: Option<String>,
    /// JSON array of image reference URLs, in display order.
    pub images: String,
    pub is_premium: bool,
    pub status: String,
    pub views: i32,
    pub inquiries: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
