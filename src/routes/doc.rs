use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        MessageResponse,
        auth::{LoginRequest, LoginResponse},
        donations::{
            BookCondition, CoverData, CreateDonationRequest, CreatedDonation, DonationBookData,
            DonationBookList, DonationRequested, RecipientDonationList, UpdateDonationRequest,
        },
        genres::{CreateGenreRequest, CreatedGenre, GenreList},
        reviews::{
            CommentList, CommentRequest, CommentTarget, CommentUpdateRequest, CreatedComment,
            CreatedReview, LikesData, ReviewData, ReviewList, ReviewRequest,
        },
        users::{RegisterRequest, RegisteredUser, UserData},
    },
    models::{Comment, DonationBook, Genre, RecipientDonation, Review, UserProfile},
    response::ApiResponse,
    routes::{auth, comments, donations, genres, health, reviews, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::get_user,
        users::list_user_reviews,
        users::upload_profile_image,
        auth::login,
        genres::list_genres,
        genres::create_genre,
        donations::create_donation,
        donations::list_donations,
        donations::get_donation,
        donations::update_donation,
        donations::delete_donation,
        donations::upload_cover,
        donations::request_donation,
        donations::list_donation_requests,
        donations::list_my_requests,
        reviews::create_review,
        reviews::list_reviews,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        reviews::upload_cover,
        reviews::like_review,
        reviews::unlike_review,
        comments::create_comment,
        comments::list_comments,
        comments::update_comment,
        comments::delete_comment,
        comments::update_comment_by_body,
        comments::delete_comment_by_body
    ),
    components(
        schemas(
            UserProfile,
            Genre,
            DonationBook,
            RecipientDonation,
            Review,
            Comment,
            BookCondition,
            MessageResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            RegisteredUser,
            UserData,
            CreateGenreRequest,
            CreatedGenre,
            GenreList,
            CreateDonationRequest,
            UpdateDonationRequest,
            CreatedDonation,
            DonationBookList,
            DonationBookData,
            CoverData,
            DonationRequested,
            RecipientDonationList,
            ReviewRequest,
            CreatedReview,
            ReviewList,
            ReviewData,
            LikesData,
            CommentRequest,
            CommentUpdateRequest,
            CommentTarget,
            CreatedComment,
            CommentList,
            ApiResponse<UserData>,
            ApiResponse<DonationBookList>,
            ApiResponse<ReviewList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Registration, profiles and profile images"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Genres", description = "Genre catalogue"),
        (name = "Donations", description = "Donation books and recipient requests"),
        (name = "Reviews", description = "Book reviews, covers and likes"),
        (name = "Comments", description = "Comments on reviews"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
