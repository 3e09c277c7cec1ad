mod common;

use axum::body::Bytes;
use bookshare_api::{
    dto::{
        auth::LoginRequest,
        donations::{BookCondition, CreateDonationRequest, UpdateDonationRequest},
        genres::CreateGenreRequest,
    },
    error::AppError,
    middleware::auth::decode_access_token,
    services::{
        auth_service, donation_service, genre_service, recipient_donation_service, user_service,
    },
    storage::ImageUpload,
};
use futures::stream;
use serial_test::serial;

use common::{create_admin, create_user, database_url, ensure_genre, register_request, setup_state, unique};

macro_rules! require_db {
    () => {
        match database_url() {
            Some(url) => url,
            None => {
                eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB flow tests.");
                return Ok(());
            }
        }
    };
}

fn dune() -> CreateDonationRequest {
    CreateDonationRequest {
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        publisher: "Chilton".into(),
        publish_year: 1965,
        synopsis: "Spice must flow".into(),
        genre: "fiksi".into(),
        book_condition: BookCondition::Bekas,
    }
}

fn png(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        data: Bytes::from_static(b"\x89PNG fake image"),
    }
}

#[tokio::test]
#[serial]
async fn register_rejects_taken_username_and_login_issues_token() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let username = unique("alice");
    let created = auth_service::register_user(&state, register_request(&username)).await?;
    assert!(created.id.starts_with("users-"));

    let mut again = register_request(&username);
    again.email = format!("{}@other.example.com", unique("x"));
    match auth_service::register_user(&state, again).await {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "username sudah digunakan"),
        other => panic!("expected bad request, got {other:?}"),
    }

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            username: username.clone(),
            password: "rahasia123".into(),
        },
    )
    .await?;
    let claims = decode_access_token(&state.config, &login.access_token)?;
    assert_eq!(claims.id, created.id);
    assert_eq!(claims.role, "user");

    let by_email = auth_service::login_user(
        &state,
        LoginRequest {
            username: format!("{username}@example.com"),
            password: "rahasia123".into(),
        },
    )
    .await?;
    assert!(!by_email.access_token.is_empty());

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            username: username.clone(),
            password: "salah".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

    let mut squatter = register_request(&unique("mallory"));
    squatter.username = format!("{username}@example.com");
    assert!(matches!(
        auth_service::register_user(&state, squatter).await,
        Err(AppError::BadRequest(_))
    ));
    let by_email = auth_service::login_user(
        &state,
        LoginRequest {
            username: format!("{username}@example.com"),
            password: "rahasia123".into(),
        },
    )
    .await?;
    let claims = decode_access_token(&state.config, &by_email.access_token)?;
    assert_eq!(claims.id, created.id);

    let profile = user_service::get_user(&state, &created.id).await?;
    assert!(profile.image_url.is_none());
    assert!(matches!(
        user_service::get_user(&state, "users-missing").await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn profile_image_latest_upload_wins() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    let user = create_user(&state, "pic").await?;

    let body = stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"first"))]);
    user_service::upload_profile_image(&state, &user.id, "a.png", Some("image/png"), body).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let body = stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"second"))]);
    let latest =
        user_service::upload_profile_image(&state, &user.id, "b.png", Some("image/png"), body)
            .await?;

    let profile = user_service::get_user(&state, &user.id).await?;
    assert_eq!(profile.image_url.as_deref(), Some(latest.as_str()));

    let body = stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"text"))]);
    let rejected =
        user_service::upload_profile_image(&state, &user.id, "a.txt", Some("text/plain"), body)
            .await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
#[serial]
async fn profile_image_ties_break_on_id() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    let user = create_user(&state, "tie").await?;

    for (id, image) in [("image-a", "/uploads/a.png"), ("image-b", "/uploads/b.png")] {
        sqlx::query(
            "INSERT INTO image_profiles (id, user_id, url, created_at) VALUES ($1, $2, $3, '2024-01-01T00:00:00Z')",
        )
        .bind(format!("{id}-{}", user.id))
        .bind(&user.id)
        .bind(image)
        .execute(&state.pool)
        .await?;
    }

    let profile = user_service::get_user(&state, &user.id).await?;
    assert_eq!(profile.image_url.as_deref(), Some("/uploads/b.png"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn only_owner_or_admin_changes_a_donation() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    ensure_genre(&state, "Fiksi").await?;

    let owner = create_user(&state, "owner").await?;
    let other = create_user(&state, "other").await?;
    let admin = create_admin(&state).await?;

    let created = donation_service::create_donation(&state, &owner, dune(), None).await?;
    let book = donation_service::get_donation(&state, &created.book_id).await?;
    assert_eq!(book.title, "Dune");
    assert_eq!(book.genre, "Fiksi");
    assert_eq!(book.book_condition, "bekas");
    assert!(book.cover_url.is_none());

    let hijack = UpdateDonationRequest {
        title: Some("Hijacked".into()),
        ..Default::default()
    };
    let denied = donation_service::update_donation(&state, &other, &created.book_id, hijack).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    let book = donation_service::get_donation(&state, &created.book_id).await?;
    assert_eq!(book.title, "Dune");

    let fix = UpdateDonationRequest {
        title: Some("Dune (1965)".into()),
        book_condition: Some(BookCondition::Baru),
        ..Default::default()
    };
    donation_service::update_donation(&state, &admin, &created.book_id, fix).await?;
    let book = donation_service::get_donation(&state, &created.book_id).await?;
    assert_eq!(book.title, "Dune (1965)");
    assert_eq!(book.book_condition, "baru");

    let missing = UpdateDonationRequest {
        title: Some("x".into()),
        ..Default::default()
    };
    assert!(matches!(
        donation_service::update_donation(&state, &owner, "donation-missing", missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        donation_service::get_donation(&state, "donation-missing").await,
        Err(AppError::NotFound(_))
    ));

    let nothing = donation_service::update_donation(
        &state,
        &owner,
        &created.book_id,
        UpdateDonationRequest::default(),
    )
    .await;
    assert!(matches!(nothing, Err(AppError::BadRequest(_))));

    let bad_genre = || UpdateDonationRequest {
        genre: Some(unique("nosuchgenre")),
        ..Default::default()
    };
    assert!(matches!(
        donation_service::update_donation(&state, &owner, "nonexistent-id", bad_genre()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        donation_service::update_donation(&state, &other, &created.book_id, bad_genre()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        donation_service::update_donation(&state, &owner, &created.book_id, bad_genre()).await,
        Err(AppError::BadRequest(_))
    ));

    let mut unknown_genre = dune();
    unknown_genre.genre = unique("genre");
    assert!(matches!(
        donation_service::create_donation(&state, &owner, unknown_genre, None).await,
        Err(AppError::BadRequest(_))
    ));

    assert!(matches!(
        donation_service::delete_donation(&state, &other, &created.book_id).await,
        Err(AppError::Forbidden(_))
    ));
    donation_service::delete_donation(&state, &owner, &created.book_id).await?;
    assert!(matches!(
        donation_service::get_donation(&state, &created.book_id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        donation_service::delete_donation(&state, &owner, &created.book_id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn cover_url_points_at_stored_file() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    ensure_genre(&state, "Fiksi").await?;
    let owner = create_user(&state, "covers").await?;

    let created =
        donation_service::create_donation(&state, &owner, dune(), Some(png("dune.png"))).await?;
    let book = donation_service::get_donation(&state, &created.book_id).await?;
    let cover_url = book.cover_url.expect("cover url");

    let relative = cover_url.strip_prefix("/uploads/").expect("uploads prefix");
    let path = state.config.upload_dir.join(relative);
    assert_eq!(tokio::fs::read(&path).await?, b"\x89PNG fake image");

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .expect("cover filename")
        .to_string();
    donation_service::release_cover_file(&state, &filename).await;
    assert!(path.exists(), "a referenced cover must survive cleanup");

    let orphan = format!("orphan-{}.png", unique("cover"));
    let orphan_path = state
        .storage
        .donation_covers
        .write_bytes(Bytes::from_static(b"orphan"), &orphan)
        .await?;
    donation_service::release_cover_file(&state, &orphan).await;
    assert!(!orphan_path.exists());

    let other = create_user(&state, "notowner").await?;
    let body = stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"x"))]);
    let denied = donation_service::upload_cover(
        &state,
        &other,
        &created.book_id,
        "x.png",
        Some("image/png"),
        body,
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let mut bad_cover = png("dune.txt");
    bad_cover.content_type = Some("text/plain".into());
    assert!(matches!(
        donation_service::create_donation(&state, &owner, dune(), Some(bad_cover)).await,
        Err(AppError::BadRequest(_))
    ));

    donation_service::delete_donation(&state, &owner, &created.book_id).await?;
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn recipients_request_once_and_owners_see_requests() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    ensure_genre(&state, "Fiksi").await?;

    let owner = create_user(&state, "giver").await?;
    let recipient = create_user(&state, "taker").await?;
    let created = donation_service::create_donation(&state, &owner, dune(), None).await?;

    let requested =
        recipient_donation_service::request_donation(&state, &recipient, &created.book_id).await?;
    assert_eq!(requested.donation_status, "requested");

    assert!(matches!(
        recipient_donation_service::request_donation(&state, &recipient, &created.book_id).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        recipient_donation_service::request_donation(&state, &owner, &created.book_id).await,
        Err(AppError::BadRequest(_))
    ));

    assert!(matches!(
        recipient_donation_service::request_donation(&state, &recipient, "nonexistent-id").await,
        Err(AppError::NotFound(_))
    ));
    let stray: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM recipient_donations WHERE id_donation = $1")
            .bind("nonexistent-id")
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(stray, 0);

    let for_owner =
        recipient_donation_service::list_requests_for_donation(&state, &owner, &created.book_id)
            .await?;
    assert_eq!(for_owner.len(), 1);
    assert_eq!(for_owner[0].recipient_id, recipient.id);
    assert_eq!(for_owner[0].owner_id, owner.id);

    assert!(matches!(
        recipient_donation_service::list_requests_for_donation(
            &state,
            &recipient,
            &created.book_id
        )
        .await,
        Err(AppError::Forbidden(_))
    ));

    let mine = recipient_donation_service::list_my_requests(&state, &recipient).await?;
    assert!(mine.iter().any(|r| r.id == requested.id));
    Ok(())
}

#[tokio::test]
#[serial]
async fn store_rejects_out_of_range_year() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    ensure_genre(&state, "Fiksi").await?;
    let owner = create_user(&state, "raw").await?;

    let genre_id: String = sqlx::query_scalar("SELECT id FROM genres WHERE name = 'Fiksi'")
        .fetch_one(&state.pool)
        .await?;
    let result = sqlx::query(
        r#"
        INSERT INTO donation_books
            (id, owner, title, author, publisher, publish_year, synopsis, genre, book_condition)
        VALUES ($1, $2, 'Old', 'Anon', 'Press', 999, 'Too old', $3, 'bekas')
        "#,
    )
    .bind(bookshare_api::ids::new_id("donation"))
    .bind(&owner.id)
    .bind(&genre_id)
    .execute(&state.pool)
    .await;

    let err = AppError::from(result.expect_err("check constraint"));
    assert_eq!(err.classify().0, axum::http::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
#[serial]
async fn only_admins_create_genres() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;
    let user = create_user(&state, "plain").await?;
    let admin = create_admin(&state).await?;
    let name = unique("Genre");

    let denied = genre_service::create_genre(
        &state,
        &user,
        CreateGenreRequest { name: name.clone() },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let created =
        genre_service::create_genre(&state, &admin, CreateGenreRequest { name: name.clone() })
            .await?;
    assert!(created.genre_id.starts_with("genre-"));

    let duplicate = genre_service::create_genre(
        &state,
        &admin,
        CreateGenreRequest {
            name: name.to_lowercase(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let genres = genre_service::list_genres(&state).await?;
    assert!(genres.iter().any(|g| g.name == name));
    assert_eq!(genre_service::resolve_genre_id(&state, &name.to_uppercase()).await?, created.genre_id);
    Ok(())
}
