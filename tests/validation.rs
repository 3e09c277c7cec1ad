use bookshare_api::{
    dto::{
        donations::{BookCondition, CreateDonationRequest, UpdateDonationRequest},
        reviews::ReviewRequest,
        users::RegisterRequest,
    },
    error::AppError,
    validation::{camel_case, current_year, validate_image_content_type, validate_payload},
};
use serde_json::json;

fn donation_body(year: i32) -> serde_json::Value {
    json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "publisher": "Chilton",
        "publishYear": year,
        "synopsis": "Spice",
        "genre": "Fiksi",
        "bookCondition": "bekas"
    })
}

#[test]
fn publish_year_bounds() {
    let ok: CreateDonationRequest = serde_json::from_value(donation_body(1965)).unwrap();
    assert!(validate_payload(&ok).is_ok());

    let this_year: CreateDonationRequest =
        serde_json::from_value(donation_body(current_year())).unwrap();
    assert!(validate_payload(&this_year).is_ok());

    for year in [999, current_year() + 1] {
        let bad: CreateDonationRequest = serde_json::from_value(donation_body(year)).unwrap();
        match validate_payload(&bad) {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.contains("\"publishYear\""), "{msg}");
                assert!(!msg.contains("publish_year"), "{msg}");
            }
            other => panic!("expected bad request, got {other:?}"),
        }
    }
}

#[test]
fn book_condition_accepts_english_aliases() {
    assert_eq!(BookCondition::parse("New"), Some(BookCondition::Baru));
    assert_eq!(BookCondition::parse("bekas"), Some(BookCondition::Bekas));
    assert_eq!(BookCondition::parse("rusak"), None);

    for (raw, expected) in [
        ("NEW", BookCondition::Baru),
        ("Used", BookCondition::Bekas),
        (" Baru ", BookCondition::Baru),
    ] {
        let mut body = donation_body(2000);
        body["bookCondition"] = json!(raw);
        let req: CreateDonationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.book_condition, expected);
    }
    assert_eq!(serde_json::to_value(BookCondition::Baru).unwrap(), json!("baru"));

    let mut body = donation_body(2000);
    body["bookCondition"] = json!("used");
    let req: CreateDonationRequest = serde_json::from_value(body).unwrap();
    assert_eq!(req.book_condition, BookCondition::Bekas);

    let mut body = donation_body(2000);
    body["bookCondition"] = json!("rusak");
    assert!(serde_json::from_value::<CreateDonationRequest>(body).is_err());
}

#[test]
fn blank_title_is_rejected() {
    let mut body = donation_body(2000);
    body["title"] = json!("   ");
    let req: CreateDonationRequest = serde_json::from_value(body).unwrap();
    match validate_payload(&req) {
        Err(AppError::BadRequest(msg)) => assert!(msg.contains("\"title\"")),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[test]
fn partial_update_only_validates_present_fields() {
    let req: UpdateDonationRequest = serde_json::from_value(json!({ "title": "Dune Messiah" })).unwrap();
    assert!(!req.is_empty());
    assert!(validate_payload(&req).is_ok());

    let empty: UpdateDonationRequest = serde_json::from_value(json!({})).unwrap();
    assert!(empty.is_empty());

    let bad: UpdateDonationRequest = serde_json::from_value(json!({ "publishYear": 999 })).unwrap();
    assert!(validate_payload(&bad).is_err());
}

#[test]
fn register_accepts_numeric_contact() {
    let req: RegisterRequest = serde_json::from_value(json!({
        "username": "alice",
        "fullname": "Alice",
        "password": "secret",
        "email": "alice@example.com",
        "no_contact": 8123456789u64,
        "address": "Bandung"
    }))
    .unwrap();
    assert_eq!(req.no_contact, "8123456789");
    assert!(req.sosmed_url.is_empty());
    assert!(validate_payload(&req).is_ok());
}

#[test]
fn register_rejects_invalid_email() {
    let req: RegisterRequest = serde_json::from_value(json!({
        "username": "alice",
        "fullname": "Alice",
        "password": "secret",
        "email": "not-an-email",
        "no_contact": "0812",
        "address": "Bandung"
    }))
    .unwrap();
    match validate_payload(&req) {
        Err(AppError::BadRequest(msg)) => assert!(msg.contains("\"email\"")),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[test]
fn register_rejects_email_shaped_username() {
    let req: RegisterRequest = serde_json::from_value(json!({
        "username": "victim@example.com",
        "fullname": "Mallory",
        "password": "secret",
        "email": "mallory@example.com",
        "no_contact": "0812",
        "address": "Bandung"
    }))
    .unwrap();
    match validate_payload(&req) {
        Err(AppError::BadRequest(msg)) => assert!(msg.contains("\"username\""), "{msg}"),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[test]
fn messages_use_the_keys_clients_send() {
    assert_eq!(camel_case("publish_year"), "publishYear");
    assert_eq!(camel_case("book_condition"), "bookCondition");
    assert_eq!(camel_case("title"), "title");

    let req: RegisterRequest = serde_json::from_value(json!({
        "username": "alice",
        "fullname": "Alice",
        "password": "secret",
        "email": "alice@example.com",
        "no_contact": "08-12",
        "address": "Bandung"
    }))
    .unwrap();
    match validate_payload(&req) {
        Err(AppError::BadRequest(msg)) => assert!(msg.contains("\"no_contact\""), "{msg}"),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[test]
fn review_rating_range() {
    let body = |rating: i32| {
        json!({
            "title": "Laskar Pelangi",
            "author": "Andrea Hirata",
            "publisher": "Bentang",
            "publishYear": 2005,
            "synopsis": "Belitung",
            "genre": "Novel",
            "rating": rating
        })
    };
    let ok: ReviewRequest = serde_json::from_value(body(5)).unwrap();
    assert!(validate_payload(&ok).is_ok());

    for rating in [0, 6] {
        let bad: ReviewRequest = serde_json::from_value(body(rating)).unwrap();
        assert!(validate_payload(&bad).is_err());
    }
}

#[test]
fn only_image_content_types_are_accepted() {
    assert!(validate_image_content_type(Some("image/png")).is_ok());
    assert!(validate_image_content_type(Some("image/webp")).is_ok());
    assert!(validate_image_content_type(Some("text/plain")).is_err());
    assert!(validate_image_content_type(None).is_err());
}
