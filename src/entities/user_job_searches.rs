use sea_orm::entity::prelude::*;

/// Append-only record of one fresh external search. `job_data` holds the
/// ranked listings as JSON; deletion is handled outside this service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_job_searches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub search_query: String,
    pub search_location: Option<String>,
    pub search_employment_type: Option<String>,
    pub search_experience: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub job_data: String,
    pub month_year: String,
    pub search_timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
