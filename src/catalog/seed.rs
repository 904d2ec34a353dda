use crate::catalog::{ListingCatalog, NewListing};
use crate::error::Result;
use crate::store::ListingStore;
use tracing::info;

/// Demo campus listings used to populate an empty catalog
pub fn demo_listings() -> Vec<NewListing> {
    vec![
        NewListing::new(
            1,
            "MacBook Air M1",
            "13 inch, 8GB RAM, 256GB SSD. Battery health 91%, charger included.",
            650.0,
            "Like New",
        )
        .category("Electronics")
        .images(["demo/macbook_air_m1.jpg"])
        .contact_email("demo.seller1@charlotte.edu"),
        NewListing::new(
            1,
            "Calculus Textbook Bundle",
            "Stewart Calculus 8th edition plus the student solutions manual. Light highlighting.",
            85.0,
            "Good",
        )
        .category("Books")
        .images(["demo/textbooks_1.jpg", "demo/textbooks_2.jpg"]),
        NewListing::new(
            2,
            "TI-84 Plus Calculator",
            "Graphing calculator, works perfectly. New batteries.",
            60.0,
            "Good",
        )
        .category("Electronics")
        .images(["demo/ti84.jpg"])
        .contact_phone("704-555-0142"),
        NewListing::new(
            2,
            "Dorm Mini Fridge",
            "3.1 cu ft with top freezer. Pick up on campus before move-out.",
            100.0,
            "Fair",
        )
        .category("Furniture")
        .images(["demo/mini_fridge_1.jpg", "demo/mini_fridge_2.jpg"]),
        NewListing::new(
            3,
            "Xbox Series S",
            "Comes with one controller and HDMI cable. Some scuffs on the case.",
            200.0,
            "Good",
        )
        .category("Electronics")
        .images(["demo/xbox_1.jpg", "demo/xbox_2.jpg"]),
        NewListing::new(
            3,
            "Mountain Bike",
            "Used bicycle, good condition. 21 speeds, new tires last semester.",
            150.0,
            "Good",
        )
        .category("Hobby"),
        NewListing::new(
            4,
            "Winter Jacket",
            "North Face puffer, size M. Missing one zipper pull.",
            40.0,
            "Fair",
        )
        .category("Clothing"),
        NewListing::new(
            4,
            "Broken Desk Lamp",
            "Bulb socket is loose, useful for the base and shade.",
            0.0,
            "For Parts",
        ),
    ]
}

/// Create every demo listing through the catalog so they pass the same rules as user input
pub fn seed_demo<S: ListingStore>(catalog: &mut ListingCatalog<S>) -> Result<usize> {
    let listings = demo_listings();
    let count = listings.len();
    for listing in listings {
        catalog.create(listing)?;
    }
    info!("📋 Seeded {} demo listings", count);
    Ok(count)
}
