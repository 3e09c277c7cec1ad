use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donation_books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publish_year: i32,
    pub synopsis: String,
    pub genre: String,
    pub book_condition: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Owner",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::genres::Entity",
        from = "Column::Genre",
        to = "super::genres::Column::Id",
        on_delete = "Cascade"
    )]
    Genres,
    #[sea_orm(has_many = "super::donation_covers::Entity")]
    DonationCovers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genres.def()
    }
}

impl Related<super::donation_covers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationCovers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
