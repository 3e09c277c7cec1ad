use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::{
    audit,
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    dto::users::{RegisterRequest, RegisteredUser},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    ids::new_id,
    models::Role,
    state::AppState,
    validation::validate_payload,
};

const INVALID_CREDENTIALS: &str = "Kredensial yang Anda berikan salah";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_access_token(config: &AppConfig, user_id: &str, role: Role) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(config.access_token_age))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        id: user_id.to_string(),
        role: role.as_str().to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_token_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<RegisteredUser> {
    // An '@' in a username would let it shadow another account's email at login.
    validate_payload(&payload)?;
    let RegisterRequest {
        username,
        fullname,
        password,
        email,
        no_contact,
        address,
        sosmed_url,
    } = payload;
    let username = username.trim().to_string();
    let email = email.trim().to_lowercase();

    let taken = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::bad_request("username sudah digunakan"));
    }

    let taken = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::bad_request("email sudah digunakan"));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(new_id("users")),
        username: Set(username),
        fullname: Set(fullname.trim().to_string()),
        email: Set(email),
        password: Set(password_hash),
        address: Set(Some(address)),
        sosmed_url: Set(serde_json::json!(sosmed_url)),
        role: Set(Role::User.as_str().to_string()),
        contact_number: Set(no_contact),
        joined_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, "user registered");
    audit::record(
        &state.pool,
        Some(&user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(RegisteredUser { id: user.id })
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: String,
    password: String,
    role: String,
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { username, password } = payload;
    let identifier = username.trim();

    // Usernames never contain '@', but an exact username match still wins over an email.
    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT id, password, role FROM users
        WHERE username = $1 OR email = LOWER($1)
        ORDER BY (username = $1) DESC
        LIMIT 1
        "#,
    )
    .bind(identifier)
    .fetch_optional(&state.pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };

    if !verify_password(&password, &row.password)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let role = Role::parse(&row.role)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown role {}", row.role)))?;
    let token = issue_access_token(&state.config, &row.id, role)?;

    audit::record(
        &state.pool,
        Some(&row.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": row.id }),
    )
    .await;

    Ok(LoginResponse {
        access_token: token,
    })
}
