use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use parkease_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    let user_id = ensure_user(&pool, "demo@parkease.com", "Demo User", "user").await?;
    let admin_id = ensure_user(&pool, "admin@parkease.com", "Admin User", "admin").await?;
    seed_parking_spots(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, name, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_parking_spots(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // Only seed an empty table, like the original initializer.
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM parking_spots")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Parking spots already present, skipping seed");
        return Ok(());
    }

    let spots: Vec<(&str, &str, Decimal, i32, f64, f64, f64)> = vec![
        (
            "USF Parking Garage 1",
            "USF Holly Drive",
            dec!(4.99),
            100,
            28.0639,
            -82.4128,
            4.5,
        ),
        (
            "USF Library Parking",
            "USF Campus",
            dec!(2.99),
            50,
            28.0589,
            -82.4138,
            4.2,
        ),
    ];

    for (name, address, price, available_spots, latitude, longitude, rating) in spots {
        sqlx::query(
            r#"
            INSERT INTO parking_spots
                (id, name, address, city, price, available_spots, latitude, longitude, rating, source)
            VALUES ($1, $2, $3, 'Tampa', $4, $5, $6, $7, $8, 'local')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .bind(price)
        .bind(available_spots)
        .bind(latitude)
        .bind(longitude)
        .bind(rating)
        .execute(pool)
        .await?;
    }

    println!("Seeded parking spots");
    Ok(())
}
