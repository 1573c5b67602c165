//! Seed script for development: populates the ads_products table with sample listings.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Prints a session token per demo user
//! when `AUTH_JWT_SECRET` is set, so the API can be exercised right away.

use adswap::models::product::NewProduct;
use adswap::services::session::issue_token;
use adswap::store::{AdSwapStore, PgStore};

const DEMO_PRODUCTS: &[(&str, &str, &str, &str, &str)] = &[
    ("demo-alice", "Inkwell", "https://inkwell.example", "Weekly notes for indie writers", "Newsletter"),
    ("demo-alice", "Pixel Pantry", "https://pixelpantry.example", "Free icons, no strings", "Twitter"),
    ("demo-bob", "Shipyard", "https://shipyard.example", "Launch checklists that ship", "Blog"),
    ("demo-carol", "Hirelane", "https://hirelane.example", "Remote roles, hand picked", "LinkedIn"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = adswap::db::create_pool(&db_url, 5).await?;
    let store = PgStore::new(pool);

    println!("=== Ad Swap Seed Script ===");

    seed_products(&store).await?;
    print_tokens()?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_products(store: &PgStore) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ads_products WHERE user_id LIKE 'demo-%'")
        .fetch_one(store.pool())
        .await?;

    if count > 0 {
        println!("[skip] {count} demo products already present");
        return Ok(());
    }

    for (owner, name, url, tagline, platform) in DEMO_PRODUCTS {
        let product = store
            .insert_product(&NewProduct {
                user_id: (*owner).to_string(),
                name: (*name).to_string(),
                url: (*url).to_string(),
                tagline: (*tagline).to_string(),
                platform: (*platform).to_string(),
                logo_url: None,
            })
            .await?;
        println!("[done] {owner}: {} ({})", product.name, product.id);
    }
    Ok(())
}

fn print_tokens() -> anyhow::Result<()> {
    let Ok(secret) = std::env::var("AUTH_JWT_SECRET") else {
        return Ok(());
    };
    let audience =
        std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".to_string());

    println!("\nSession tokens (valid 24h):");
    for user in ["demo-alice", "demo-bob", "demo-carol"] {
        let token = issue_token(user, &secret, &audience, 86_400)?;
        println!("  {user}: {token}");
    }
    Ok(())
}
