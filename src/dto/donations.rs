use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::{DonationBook, RecipientDonation},
    validation::{WireNames, camel_case, validate_not_blank, validate_publish_year},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum BookCondition {
    #[serde(rename = "baru")]
    Baru,
    #[serde(rename = "bekas")]
    Bekas,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::Baru => "baru",
            BookCondition::Bekas => "bekas",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "baru" | "new" => Some(BookCondition::Baru),
            "bekas" | "used" => Some(BookCondition::Bekas),
            _ => None,
        }
    }
}

/// Accepts `baru`/`bekas` and the English `new`/`used`, in any case.
impl<'de> Deserialize<'de> for BookCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        BookCondition::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "bookCondition harus 'baru' atau 'bekas', bukan '{raw}'"
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub title: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub author: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub publisher: String,
    #[validate(custom(function = "validate_publish_year"))]
    pub publish_year: i32,
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub synopsis: String,
    /// Genre name, matched case-insensitively.
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub genre: String,
    pub book_condition: BookCondition,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "tidak boleh kosong"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub title: Option<String>,
    #[validate(
        custom(function = "validate_not_blank", message = "tidak boleh kosong"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub author: Option<String>,
    #[validate(
        custom(function = "validate_not_blank", message = "tidak boleh kosong"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub publisher: Option<String>,
    #[validate(custom(function = "validate_publish_year"))]
    pub publish_year: Option<i32>,
    #[validate(custom(function = "validate_not_blank", message = "tidak boleh kosong"))]
    pub synopsis: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "tidak boleh kosong"))]
    pub genre: Option<String>,
    pub book_condition: Option<BookCondition>,
}

impl WireNames for CreateDonationRequest {
    fn wire_name(field: &str) -> String {
        camel_case(field)
    }
}

impl WireNames for UpdateDonationRequest {
    fn wire_name(field: &str) -> String {
        camel_case(field)
    }
}

impl UpdateDonationRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publisher.is_none()
            && self.publish_year.is_none()
            && self.synopsis.is_none()
            && self.genre.is_none()
            && self.book_condition.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDonation {
    pub book_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DonationBookList {
    pub books: Vec<DonationBook>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DonationBookData {
    pub book: DonationBook,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CoverData {
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequested {
    pub donation_status: String,
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipientDonationList {
    pub requests: Vec<RecipientDonation>,
}
