use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub fullname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub sosmed_url: Json,
    pub role: String,
    pub contact_number: String,
    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donation_books::Entity")]
    DonationBooks,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::image_profiles::Entity")]
    ImageProfiles,
}

impl Related<super::donation_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationBooks.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::image_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImageProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
