pub mod comments;
pub mod donation_books;
pub mod donation_covers;
pub mod genres;
pub mod image_profiles;
pub mod ratings;
pub mod review_covers;
pub mod reviews;
pub mod users;

pub use comments::Entity as Comments;
pub use donation_books::Entity as DonationBooks;
pub use donation_covers::Entity as DonationCovers;
pub use genres::Entity as Genres;
pub use image_profiles::Entity as ImageProfiles;
pub use ratings::Entity as Ratings;
pub use review_covers::Entity as ReviewCovers;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
