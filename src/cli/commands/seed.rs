use crate::config::Config;
use crate::db::Store;
use crate::models::listing::{
    Category, Condition, CycleType, FrameMaterial, NewListing, Suspension, Transmission, WheelSize,
};

/// Inserts two demo sellers, a pair of listings and a few FAQs so a fresh
/// install has something to browse.
pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username("certified_seller").await?.is_some() {
        println!("Demo data already present. Nothing to do.");
        return Ok(());
    }

    let seller = store
        .create_user("certified_seller", "password", "john@example.com", "Mumbai")
        .await?;
    store
        .create_user("casual_seller", "password", "jane@example.com", "Mumbai")
        .await?;
    println!("✓ Created demo users (password: \"password\")");

    let listings = [
        NewListing {
            seller_id: seller.id,
            category: Category::Adult,
            brand: "Trek".to_string(),
            model: "Marlin 7".to_string(),
            purchase_year: 2023,
            price: 85000,
            gear_transmission: Transmission::MultiSpeed,
            frame_material: FrameMaterial::Aluminum,
            suspension: Suspension::Front,
            condition: Condition::LikeNew,
            cycle_type: CycleType::Mountain,
            wheel_size: WheelSize::W29,
            has_receipt: true,
            additional_details: Some(
                "Top-of-the-line mountain bike with premium components".to_string(),
            ),
            images: vec![
                "/images/demo-mountain-1.jpg".to_string(),
                "/images/demo-mountain-2.jpg".to_string(),
            ],
            is_premium: true,
        },
        NewListing {
            seller_id: seller.id,
            category: Category::Adult,
            brand: "Specialized".to_string(),
            model: "Allez".to_string(),
            purchase_year: 2022,
            price: 95000,
            gear_transmission: Transmission::MultiSpeed,
            frame_material: FrameMaterial::CarbonFiber,
            suspension: Suspension::None,
            condition: Condition::Good,
            cycle_type: CycleType::Road,
            wheel_size: WheelSize::W275,
            has_receipt: true,
            additional_details: Some("Professional road bike, perfect for racing".to_string()),
            images: vec![
                "/images/demo-road-1.jpg".to_string(),
                "/images/demo-road-2.jpg".to_string(),
            ],
            is_premium: true,
        },
    ];

    for listing in &listings {
        let created = store.create_listing(listing).await?;
        println!(
            "✓ Listed: {} {} at {} (ID: {})",
            created.brand, created.model, created.price, created.id
        );
    }

    let faqs = [
        (
            "How do I list my bicycle?",
            "Sign in, open the sell page and fill in the details of your bicycle. \
             Photos and a purchase receipt help it sell faster.",
            "selling",
            1,
        ),
        (
            "Are the bicycles inspected?",
            "Listings marked premium are inspected by a certified partner before \
             they go live.",
            "buying",
            2,
        ),
        (
            "Can I reserve a bicycle?",
            "Yes. Send the seller an inquiry and they can mark the listing as \
             reserved for you.",
            "buying",
            3,
        ),
    ];

    let faq_count = faqs.len();
    for (question, answer, category, order) in faqs {
        store.create_faq(question, answer, category, order).await?;
    }
    println!("✓ Created {} FAQs", faq_count);

    println!();
    println!("Seed complete. Run 'cyclery serve' to start the marketplace.");

    Ok(())
}
