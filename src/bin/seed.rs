use bookshare_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    ids::new_id,
    models::Role,
    services::auth_service::hash_password,
};

const GENRES: &[&str] = &[
    "Fiksi",
    "Non-Fiksi",
    "Novel",
    "Komik",
    "Pendidikan",
    "Sejarah",
    "Sains",
    "Biografi",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin123", Role::Admin).await?;
    let user_id = ensure_user(&pool, "reader", "reader@example.com", "reader123", Role::User).await?;
    seed_genres(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<String> {
    let password_hash = hash_password(password)?;

    let row: Option<(String,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, fullname, email, password, role, contact_number)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(new_id("users"))
    .bind(username)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind("0800000000")
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (String,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {username} (role={})", role.as_str());
    Ok(user_id)
}

async fn seed_genres(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for name in GENRES {
        sqlx::query("INSERT INTO genres (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(new_id("genre"))
            .bind(name)
            .execute(pool)
            .await?;
    }

    println!("Seeded genres");
    Ok(())
}
