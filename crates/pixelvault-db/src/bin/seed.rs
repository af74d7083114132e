//! # Seed Data Generator
//!
//! Populates the local store with a sample catalog and discount codes.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p pixelvault-db --bin seed
//!
//! # Only the first 10 catalog entries
//! cargo run -p pixelvault-db --bin seed -- --count 10
//!
//! # Specify database path
//! cargo run -p pixelvault-db --bin seed -- --db ./data/pixelvault.db
//! ```
//!
//! ## Generated Data
//! - Each title in a digital edition (game key) and, for console titles,
//!   a physical disc edition priced 1.500 KD higher
//! - Every third product is on sale (original price 20% above)
//! - Discount codes: `SAVE10`, `WELCOME5`, `BIG20`, `GAMER15`, `SUMMER24`,
//!   and `LAUNCH3`, a single-use code that is already redeemed

use chrono::{Duration, Utc};
use clap::Parser;
use pixelvault_core::{DiscountCode, DiscountType, Money, Product};
use pixelvault_db::{Database, DbConfig};
use rust_decimal::Decimal;
use std::path::PathBuf;
use uuid::Uuid;

/// (English title, Arabic title, base price in fils, console release)
const TITLES: &[(&str, &str, i64, bool)] = &[
    ("Elden Ring", "إلدن رينغ", 17_500, true),
    ("EA Sports FC 25", "إي إيه سبورتس إف سي 25", 21_000, true),
    ("Call of Duty: Black Ops 6", "كول أوف ديوتي: بلاك أوبس 6", 21_000, true),
    ("Astro Bot", "أسترو بوت", 18_000, true),
    ("The Legend of Zelda: Tears of the Kingdom", "أسطورة زيلدا: دموع المملكة", 19_500, true),
    ("Minecraft", "ماينكرافت", 8_000, false),
    ("Hollow Knight", "هولو نايت", 4_500, false),
    ("Stardew Valley", "ستاردو فالي", 4_000, false),
    ("Ghost of Tsushima", "شبح تسوشيما", 15_000, true),
    ("Gran Turismo 7", "غران توريزمو 7", 16_500, true),
    ("PlayStation Store Gift Card 10 KD", "بطاقة متجر بلايستيشن 10 د.ك", 10_000, false),
    ("Xbox Game Pass Ultimate 3 Months", "اشتراك إكس بوكس جيم باس ألتيميت 3 أشهر", 14_250, false),
];

/// Fils added to the digital price for the boxed edition.
const DISC_PREMIUM: i64 = 1_500;

/// Single-use code seeded with its one redemption spent.
const REDEEMED_CODE: &str = "LAUNCH3";

/// PixelVault seed data generator
#[derive(Debug, Parser)]
#[command(name = "seed", about = "Populate the local store with sample products and discount codes")]
struct Args {
    /// Maximum number of products (default: all)
    #[arg(short, long)]
    count: Option<usize>,

    /// Database file path
    #[arg(short, long, env = "PIXELVAULT_DB_PATH", default_value = "./pixelvault_dev.db")]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Args { count, db: db_path } = Args::parse();
    let count = count.unwrap_or(usize::MAX);

    println!("🌱 PixelVault Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(db_path.clone())).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    for (seed, product) in catalog().into_iter().enumerate() {
        if generated >= count {
            break;
        }

        if let Err(e) = db.products().upsert(&product).await {
            eprintln!("Failed to insert {} (#{}): {}", product.title, seed, e);
            continue;
        }

        println!("  {:<48} {}", product.title, product.price);
        generated += 1;
    }

    println!("✓ Generated {} products", generated);

    println!();
    println!("Generating discount codes...");
    for code in discount_codes() {
        db.discounts().upsert(&code).await?;
        println!("  {:<10} {} {}", code.code, code.discount_value, code.discount_type);
    }
    db.discounts().record_use(REDEEMED_CODE).await?;
    println!("  {:<10} redeemed once (limit reached)", REDEEMED_CODE);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the full sample catalog.
fn catalog() -> Vec<Product> {
    let mut products = Vec::new();

    for (idx, (title, title_ar, fils, console)) in TITLES.iter().enumerate() {
        products.push(generate_product(title, title_ar, *fils, true, idx));

        if *console {
            let disc_title = format!("{} (Disc)", title);
            let disc_title_ar = format!("{} (قرص)", title_ar);
            products.push(generate_product(
                &disc_title,
                &disc_title_ar,
                fils + DISC_PREMIUM,
                false,
                idx + TITLES.len(),
            ));
        }
    }

    products
}

/// Generates a single product.
fn generate_product(title: &str, title_ar: &str, fils: i64, is_digital: bool, seed: usize) -> Product {
    let now = Utc::now();
    let price = Money::new(fils, 3);

    // Every third product is on sale: original = price * 1.2
    let original_price = (seed % 3 == 0).then(|| price * Decimal::new(12, 1));

    Product {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        title_ar: Some(title_ar.to_string()),
        price,
        original_price,
        is_digital,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Sample registry entries covering every eligibility rule.
fn discount_codes() -> Vec<DiscountCode> {
    let now = Utc::now();
    let code = |code: &str, discount_type: DiscountType, value: Decimal| DiscountCode {
        code: code.to_string(),
        discount_type,
        discount_value: value,
        min_order_amount: None,
        max_uses: None,
        used_count: 0,
        starts_at: now - Duration::days(1),
        expires_at: None,
        is_active: true,
    };

    vec![
        code("SAVE10", DiscountType::Percentage, Decimal::from(10)),
        DiscountCode {
            max_uses: Some(100),
            ..code("WELCOME5", DiscountType::Fixed, Decimal::from(5))
        },
        DiscountCode {
            min_order_amount: Some(Money::new(50, 0)),
            ..code("BIG20", DiscountType::Percentage, Decimal::from(20))
        },
        DiscountCode {
            starts_at: now + Duration::days(7),
            ..code("GAMER15", DiscountType::Percentage, Decimal::from(15))
        },
        DiscountCode {
            expires_at: Some(now - Duration::hours(1)),
            ..code("SUMMER24", DiscountType::Percentage, Decimal::from(25))
        },
        DiscountCode {
            max_uses: Some(1),
            ..code(REDEEMED_CODE, DiscountType::Fixed, Decimal::from(3))
        },
    ]
}
