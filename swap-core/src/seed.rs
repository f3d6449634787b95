//! Fixed sample catalog used for first start and for `reset`.

use sqlx::SqlitePool;

use crate::catalog;
use crate::models::NewItem;
use crate::SwapError;

struct Sample {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    price: f64,
    category: &'static str,
    condition: &'static str,
    seller_id: &'static str,
    seller_name: &'static str,
    images: &'static [&'static str],
    tags: &'static [&'static str],
    distance: f64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "item_1",
        title: "MacBook Pro 13-inch",
        description: "2020 MacBook Pro in excellent condition. Used for coding projects.",
        price: 1200.0,
        category: "Electronics",
        condition: "good",
        seller_id: "user_1",
        seller_name: "Alex Chen",
        images: &["https://example.com/macbook1.jpg"],
        tags: &["Electronics", "Laptop"],
        distance: 0.3,
    },
    Sample {
        id: "item_2",
        title: "IKEA Study Desk",
        description: "White MICKE desk with drawer, a few scratches on top",
        price: 60.0,
        category: "Furniture",
        condition: "good",
        seller_id: "user_2",
        seller_name: "Sarah Johnson",
        images: &["https://example.com/desk.jpg"],
        tags: &["Furniture", "Dorm"],
        distance: 1.2,
    },
    Sample {
        id: "item_3",
        title: "Calculus Textbook",
        description: "Stewart Calculus 8th Edition, barely used",
        price: 45.0,
        category: "Textbooks",
        condition: "like_new",
        seller_id: "user_3",
        seller_name: "Mike Rodriguez",
        images: &["https://example.com/calc_book.jpg"],
        tags: &["Textbooks", "Math"],
        distance: 0.8,
    },
    Sample {
        id: "item_4",
        title: "Winter Jacket",
        description: "North Face puffer jacket, size M, worn one season",
        price: 85.0,
        category: "Clothing",
        condition: "like_new",
        seller_id: "user_1",
        seller_name: "Alex Chen",
        images: &["https://example.com/jacket.jpg"],
        tags: &["Clothing", "Outerwear"],
        distance: 0.3,
    },
];

pub fn sample_items() -> Vec<NewItem> {
    SAMPLES
        .iter()
        .map(|s| NewItem {
            id: s.id.to_string(),
            title: s.title.to_string(),
            description: s.description.to_string(),
            price: s.price,
            category: s.category.to_string(),
            condition: s.condition.to_string(),
            seller_id: s.seller_id.to_string(),
            seller_name: s.seller_name.to_string(),
            images: s.images.iter().map(|u| u.to_string()).collect(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            distance: s.distance,
        })
        .collect()
}

/// Seed the sample catalog in one transaction if the catalog is empty.
///
/// `BEGIN IMMEDIATE` holds the write lock across the emptiness check and the
/// inserts, so two concurrent seeders never both see an empty catalog.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<usize, SwapError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    let inserted = catalog::seed(&mut *tx, sample_items()).await?;
    tx.commit().await?;
    Ok(inserted)
}
