use chrono::{Duration, NaiveTime, Utc};
use cinema_booking_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    middleware::auth::issue_token,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let movies = vec![
        ("Ferris and the Borrow Checker", "A crab learns to share.", 118, vec!["Animation", "Family"], "English"),
        ("Midnight at the Multiplex", "Nobody leaves before the credits.", 104, vec!["Thriller"], "English"),
        ("Fearless Concurrency", "Two threads, one seat.", 131, vec!["Drama", "Sci-Fi"], "English"),
    ];

    for (title, description, duration, genres, language) in movies {
        let movie_id = ensure_movie(&pool, title, description, duration, &genres, language).await?;
        seed_showtimes(&pool, movie_id, title).await?;
    }

    // Demo identities; registration lives outside this service.
    let admin_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let ttl = Duration::days(7);
    let admin_token = issue_token(&config.jwt_secret, admin_id, "admin", ttl)?;
    let user_token = issue_token(&config.jwt_secret, user_id, "user", ttl)?;

    println!("Seed completed.");
    println!("Admin ID: {admin_id}\n  token: {admin_token}");
    println!("User ID: {user_id}\n  token: {user_token}");
    Ok(())
}

async fn ensure_movie(
    pool: &DbPool,
    title: &str,
    description: &str,
    duration: i32,
    genres: &[&str],
    language: &str,
) -> anyhow::Result<Uuid> {
    let (movie_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO movies (id, title, description, duration_minutes, genres, language)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (title) DO UPDATE SET description = EXCLUDED.description
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(description)
    .bind(duration)
    .bind(serde_json::json!(genres))
    .bind(language)
    .fetch_one(pool)
    .await?;

    println!("Ensured movie {title}");
    Ok(movie_id)
}

async fn seed_showtimes(pool: &DbPool, movie_id: Uuid, title: &str) -> anyhow::Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM showtimes WHERE movie_id = $1")
        .bind(movie_id)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("Showtimes for {title} already present");
        return Ok(());
    }

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let slots = [(12, 800_i64), (16, 1000), (20, 1200)];
    for (hour, price) in slots {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid showtime hour {hour}"))?;
        let start_time = tomorrow.and_time(time).and_utc();

        sqlx::query(
            r#"
            INSERT INTO showtimes (id, movie_id, start_time, price, total_seats)
            VALUES ($1, $2, $3, $4::numeric, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(movie_id)
        .bind(start_time)
        .bind(price)
        .bind(100_i32)
        .execute(pool)
        .await?;
    }

    println!("Seeded showtimes for {title}");
    Ok(())
}
