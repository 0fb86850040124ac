use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_quotas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    /// Calendar month key, YYYY-MM. Unique together with `user_id`.
    pub month_year: String,
    pub searches_used: i32,
    pub max_searches: i32,
    pub created_at: String, // ISO8601; SQLite stores timestamps as text
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
