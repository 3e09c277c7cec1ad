use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donation_books::Entity")]
    DonationBooks,
}

impl Related<super::donation_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
