use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_saved_jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    /// Stable external listing id. Unique together with `user_id`.
    pub job_id: String,
    #[sea_orm(column_type = "Text")]
    pub job_data: String,
    pub match_score: i32,
    pub is_applied: bool,
    pub is_favorited: bool,
    pub saved_at: String,
    pub applied_at: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
