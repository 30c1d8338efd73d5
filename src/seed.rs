//! Built-in sample catalog.
//!
//! The seed list is adopted when the products slot is empty or unreadable, and
//! by [`CatalogStore::reset_to_seed`](crate::catalog_state::CatalogStore::reset_to_seed).

use std::collections::BTreeMap;

use crate::catalog_model::Product;

pub const SEED_LEN: usize = 11;

/// Brands that appear in the sample catalog, in display order.
pub const KNOWN_BRANDS: [&str; 11] = [
    "Apple",
    "Samsung",
    "Sony",
    "HP",
    "Boat",
    "Puma",
    "Peter England",
    "Honor",
    "FlexiCool",
    "Casio",
    "Saregama",
];

struct SeedRecord {
    id: u64,
    name: &'static str,
    price: f64,
    rating: f64,
    category: &'static str,
    description: &'static str,
    featured: bool,
    date_added: &'static str,
    brand: &'static str,
    tags: &'static [&'static str],
}

const SEED: [SeedRecord; SEED_LEN] = [
    SeedRecord {
        id: 1,
        name: "Boat Watch CQ1",
        price: 59.99,
        rating: 4.5,
        category: "electronics",
        description: "Premium smartwatch with advanced fitness tracking, heart rate monitoring, sleep analysis, and GPS connectivity. Features include water resistance, long battery life, and smartphone notifications.",
        featured: false,
        date_added: "2024-01-15",
        brand: "Boat",
        tags: &["smartwatch", "fitness", "wearable", "bluetooth"],
    },
    SeedRecord {
        id: 2,
        name: "Sony Headphones XC7600",
        price: 339.99,
        rating: 4.5,
        category: "electronics",
        description: "Professional-grade wireless headphones with industry-leading noise cancellation technology. Premium sound quality with 30-hour battery life and quick charge capability.",
        featured: true,
        date_added: "2024-01-16",
        brand: "Sony",
        tags: &["headphones", "wireless", "noise-canceling", "audio"],
    },
    SeedRecord {
        id: 3,
        name: "Puma Shoes 5'7",
        price: 59.99,
        rating: 4.5,
        category: "clothing",
        description: "Comfortable and stylish running shoes designed for daily wear and athletic activities. Features breathable mesh upper, cushioned sole, and durable construction.",
        featured: false,
        date_added: "2024-01-17",
        brand: "Puma",
        tags: &["shoes", "running", "athletic", "comfortable"],
    },
    SeedRecord {
        id: 4,
        name: "iPhone 16 Pro 5G Blue",
        price: 1929.99,
        rating: 4.9,
        category: "electronics",
        description: "Latest iPhone with cutting-edge A18 Pro chip, advanced triple-camera system with 5x telephoto zoom, titanium design, and ultra-fast 5G connectivity. Available in stunning Pacific Blue.",
        featured: true,
        date_added: "2024-01-18",
        brand: "Apple",
        tags: &["smartphone", "5g", "camera", "ios", "premium"],
    },
    SeedRecord {
        id: 5,
        name: "HP Inspiron 3378x Laptop",
        price: 1459.99,
        rating: 4.3,
        category: "electronics",
        description: "High-performance laptop with Intel Core i7 processor, 16GB RAM, 512GB SSD, and dedicated graphics card. Perfect for work, gaming, and creative tasks with 15.6-inch Full HD display.",
        featured: false,
        date_added: "2024-01-19",
        brand: "HP",
        tags: &["laptop", "gaming", "work", "performance", "ssd"],
    },
    SeedRecord {
        id: 6,
        name: "Samsung FHD TV 43' 2025 Model",
        price: 2029.99,
        rating: 4.2,
        category: "electronics",
        description: "Smart 4K UHD TV with Crystal Display technology, built-in streaming apps, voice control, and HDR support. Features sleek design with ultra-thin bezels and premium picture quality.",
        featured: true,
        date_added: "2024-01-20",
        brand: "Samsung",
        tags: &["tv", "4k", "smart", "streaming", "hdr"],
    },
    SeedRecord {
        id: 7,
        name: "Saregama Carvaan 2024 Special Edition",
        price: 229.99,
        rating: 4.7,
        category: "home",
        description: "Vintage-style digital music player with 5000+ preloaded Hindi songs from golden era. Features FM radio, Bluetooth connectivity, and premium wooden finish with retro design.",
        featured: false,
        date_added: "2024-01-21",
        brand: "Saregama",
        tags: &["music", "vintage", "hindi", "bluetooth", "retro"],
    },
    SeedRecord {
        id: 8,
        name: "Peter England - Maroon Shirt (Men's)",
        price: 29.99,
        rating: 4.0,
        category: "clothing",
        description: "Premium formal shirt in rich maroon color, crafted from high-quality cotton blend fabric. Features classic fit, easy-care fabric, and professional styling perfect for office wear.",
        featured: false,
        date_added: "2024-01-22",
        brand: "Peter England",
        tags: &["shirt", "formal", "cotton", "office", "menswear"],
    },
    SeedRecord {
        id: 9,
        name: "Honor X360 Tab 2024 15'",
        price: 629.99,
        rating: 4.5,
        category: "electronics",
        description: "Large 15-inch Android tablet with 2K display, powerful processor, and all-day battery life. Ideal for productivity, entertainment, and creative work with support for stylus input.",
        featured: false,
        date_added: "2024-01-23",
        brand: "Honor",
        tags: &["tablet", "android", "large-screen", "productivity", "stylus"],
    },
    SeedRecord {
        id: 10,
        name: "FlexiCool AC 1.5-Ton",
        price: 929.99,
        rating: 4.5,
        category: "home",
        description: "Energy-efficient split air conditioner with inverter technology, rapid cooling, air purification filter, and smart connectivity. Features quiet operation and eco-friendly refrigerant.",
        featured: false,
        date_added: "2024-01-24",
        brand: "FlexiCool",
        tags: &["ac", "inverter", "energy-efficient", "cooling", "smart"],
    },
    SeedRecord {
        id: 11,
        name: "G-Shock XFactor - Gold Edition",
        price: 429.99,
        rating: 4.5,
        category: "electronics",
        description: "Premium luxury sports watch with shock resistance, water resistance up to 200m, world time, stopwatch, and elegant gold-tone finish. Perfect blend of durability and style.",
        featured: true,
        date_added: "2024-01-25",
        brand: "Casio",
        tags: &["watch", "luxury", "sports", "water-resistant", "gold"],
    },
];

/// Returns a fresh copy of the seed catalog.
pub fn seed_products() -> Vec<Product> {
    SEED.iter()
        .map(|s| Product {
            id: s.id,
            name: s.name.to_string(),
            price: s.price,
            rating: s.rating,
            image: format!("/ProductImages/Item_{:02}.png", s.id),
            category: s.category.to_string(),
            description: s.description.to_string(),
            in_stock: true,
            featured: s.featured,
            date_added: s.date_added.to_string(),
            brand: Some(s.brand.to_string()),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            extra: BTreeMap::new(),
        })
        .collect()
}
