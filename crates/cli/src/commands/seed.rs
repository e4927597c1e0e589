//! Seed the database with demo clients and articles.
//!
//! Intended for local development and staging. Inserts are idempotent
//! (`ON CONFLICT DO NOTHING` on the natural keys), so re-running the
//! command is safe.

use tracing::info;

use etn_core::ClientCode;

use super::{CommandError, connect};

/// Demo clients: (code, name, address, postal code, city, sales rep, role).
const CLIENTS: &[(&str, &str, &str, &str, &str, &str, Option<&str>)] = &[
    (
        "ETN001",
        "Garage Lefebvre",
        "12 rue de l'Industrie",
        "59000",
        "Lille",
        "M. Durand",
        None,
    ),
    (
        "ETN002",
        "Transports Vasseur",
        "4 avenue du Port",
        "62200",
        "Boulogne-sur-Mer",
        "M. Durand",
        None,
    ),
    (
        "ADMIN",
        "ETN Back Office",
        "1 place du Siège",
        "59300",
        "Valenciennes",
        "",
        Some("admin"),
    ),
];

/// Demo articles: (code, designation, price, stock).
const ARTICLES: &[(&str, &str, &str, Option<i32>)] = &[
    ("VER-2040", "Vérin hydraulique 20/40", "189.90", Some(12)),
    ("FLX-0815", "Flexible 08x15 coudé", "24.50", Some(200)),
    ("POM-HP30", "Pompe haute pression 30L", "845.00", Some(3)),
    ("JNT-STD", "Pochette de joints standard", "9.90", None),
];

/// Insert the demo data set.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn demo_data() -> Result<(), CommandError> {
    info!("Connecting to storefront database...");
    let pool = connect().await?;

    for (code, nom, adresse, code_postal, ville, commercial, role) in CLIENTS {
        // Normalize through the domain type so seeds follow the same
        // rules as QR logins.
        let code = match ClientCode::parse(code) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(code, "skipping client with invalid code: {e}");
                continue;
            }
        };

        sqlx::query(
            "INSERT INTO clients (code_client, nom, adresse, code_postal, ville, commercial, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (code_client) DO NOTHING",
        )
        .bind(code.as_str())
        .bind(nom)
        .bind(adresse)
        .bind(code_postal)
        .bind(ville)
        .bind(commercial)
        .bind(role)
        .execute(&pool)
        .await?;
    }
    info!(count = CLIENTS.len(), "Clients seeded");

    for (code, designation, prix, stock) in ARTICLES {
        sqlx::query(
            "INSERT INTO articles (code, designation, prix, stock)
             VALUES ($1, $2, $3::numeric, $4)
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(code)
        .bind(designation)
        .bind(prix)
        .bind(stock)
        .execute(&pool)
        .await?;
    }
    info!(count = ARTICLES.len(), "Articles seeded");

    Ok(())
}
