//! # Starter Data
//!
//! The catalog, stores and pages a fresh backend serves before the admin has
//! saved anything. The memory backend starts from these; the SQLite backend
//! seeds them once into an empty database.

use chrono::{TimeZone, Utc};

use pharma_core::types::{Category, Page, Product, Store};

/// Starter catalog categories.
pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "1".to_string(),
            name: "Pain Relief".to_string(),
            slug: "pain-relief".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1583337130417-3346a1be7dee".to_string(),
            ),
        },
        Category {
            id: "2".to_string(),
            name: "Vitamins & Supplements".to_string(),
            slug: "vitamins".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1565071783280-719b01b29912".to_string(),
            ),
        },
        Category {
            id: "3".to_string(),
            name: "First Aid".to_string(),
            slug: "first-aid".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1603398938378-e54eab446dde".to_string(),
            ),
        },
        Category {
            id: "4".to_string(),
            name: "Skin Care".to_string(),
            slug: "skin-care".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1585945037805-5fd82c2e60b1".to_string(),
            ),
        },
    ]
}

/// Starter catalog products.
pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: "101".to_string(),
            name: "Advanced Pain Relief Gel".to_string(),
            description: "Fast-acting gel for muscle and joint pain relief. Contains cooling \
                          menthol."
                .to_string(),
            price_cents: 1299,
            category: "Pain Relief".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1629198688000-71f23e745b6e".to_string(),
            ],
            stock: 50,
            requires_prescription: false,
        },
        Product {
            id: "102".to_string(),
            name: "Multi-Vitamin Complex".to_string(),
            description: "Complete daily vitamin supplement for overall health and immunity \
                          boost."
                .to_string(),
            price_cents: 2450,
            category: "Vitamins & Supplements".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1584017911766-d451b3d0e843".to_string(),
            ],
            stock: 100,
            requires_prescription: false,
        },
        Product {
            id: "103".to_string(),
            name: "Premium Bandages Pack".to_string(),
            description: "Assorted sizes of waterproof bandages for cuts and scrapes."
                .to_string(),
            price_cents: 599,
            category: "First Aid".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1583947215259-38e31be8751f".to_string(),
            ],
            stock: 200,
            requires_prescription: false,
        },
        Product {
            id: "104".to_string(),
            name: "Hydrating Face Cream".to_string(),
            description: "Gentle moisturizing cream for sensitive skin with aloe vera."
                .to_string(),
            price_cents: 1875,
            category: "Skin Care".to_string(),
            images: vec![
                "https://images.unsplash.com/photo-1612817288484-6f916006741a".to_string(),
            ],
            stock: 35,
            requires_prescription: false,
        },
    ]
}

/// Starter pharmacy locations.
pub fn stores() -> Vec<Store> {
    vec![
        Store {
            id: "s1".to_string(),
            name: "PharmaCare Downtown".to_string(),
            address: "123 Main St, Cityville".to_string(),
            phone: "(555) 123-4567".to_string(),
            lat: 40.7128,
            lng: -74.0060,
        },
        Store {
            id: "s2".to_string(),
            name: "PharmaCare Westside".to_string(),
            address: "456 Oak Ave, Westtown".to_string(),
            phone: "(555) 987-6543".to_string(),
            lat: 34.0522,
            lng: -118.2437,
        },
        Store {
            id: "s3".to_string(),
            name: "PharmaCare North Hills".to_string(),
            address: "789 Pine Rd, Northville".to_string(),
            phone: "(555) 456-7890".to_string(),
            lat: 41.8781,
            lng: -87.6298,
        },
    ]
}

/// Starter content pages.
pub fn pages() -> Vec<Page> {
    let revised = Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap();
    vec![
        Page {
            id: "p1".to_string(),
            title: "Terms of Service".to_string(),
            slug: "terms-of-service".to_string(),
            content: "Welcome to PharmaCare Plus.\n\n\
                      1. **Acceptance of Terms**\n\
                      By accessing and using this website, you accept and agree to be bound by \
                      the terms and provision of this agreement.\n\n\
                      2. **Medical Disclaimer**\n\
                      The content on this site is for informational purposes only. It is not \
                      intended to be a substitute for professional medical advice, diagnosis, \
                      or treatment.\n\n\
                      3. **Prescription Drugs**\n\
                      Valid prescriptions are required for the purchase of certain medication. \
                      We reserve the right to verify prescriptions with your healthcare \
                      provider."
                .to_string(),
            last_updated: revised,
        },
        Page {
            id: "p2".to_string(),
            title: "Privacy Policy".to_string(),
            slug: "privacy-policy".to_string(),
            content: "Your privacy is important to us.\n\n\
                      1. **Information Collection**\n\
                      We collect information you provide directly to us, such as when you \
                      create an account, place an order, or contact customer support.\n\n\
                      2. **Data Security**\n\
                      We implement security measures to maintain the safety of your personal \
                      information."
                .to_string(),
            last_updated: revised,
        },
    ]
}
