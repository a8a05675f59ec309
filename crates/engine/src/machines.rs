//! A dispensing machine. It only groups nozzles.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub branch_id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Branches,
    #[sea_orm(has_many = "super::nozzles::Entity")]
    Nozzles,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl Related<super::nozzles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nozzles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
