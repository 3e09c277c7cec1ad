use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donation_covers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub donation_id: String,
    pub url: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donation_books::Entity",
        from = "Column::DonationId",
        to = "super::donation_books::Column::Id",
        on_delete = "Cascade"
    )]
    DonationBooks,
}

impl Related<super::donation_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
