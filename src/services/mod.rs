pub mod auth_service;
pub mod comment_service;
pub mod donation_service;
pub mod genre_service;
pub mod recipient_donation_service;
pub mod review_service;
pub mod user_service;
