use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[sea_orm(indexed)]
    pub created_at: String,
}

impl ActiveModelBehavior for ActiveModel {}
