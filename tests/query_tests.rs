use cyclery::db::Store;
use cyclery::models::listing::{
    Category, Condition, CycleType, FrameMaterial, ListingFilter, ListingStatus, NewListing,
    SortKey, Suspension, Transmission, WheelSize,
};
use cyclery::models::visit::{NewVisit, VisitDimension};
use sea_orm::{ActiveModelTrait, Set};

async fn spawn_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to create store")
}

fn listing(brand: &str, price: i64) -> NewListing {
    NewListing {
        seller_id: 1,
        category: Category::Adult,
        brand: brand.to_string(),
        model: "Test".to_string(),
        purchase_year: 2023,
        price,
        gear_transmission: Transmission::MultiSpeed,
        frame_material: FrameMaterial::Aluminum,
        suspension: Suspension::Front,
        condition: Condition::Good,
        cycle_type: CycleType::Mountain,
        wheel_size: WheelSize::W26,
        has_receipt: false,
        additional_details: None,
        images: vec![],
        is_premium: false,
    }
}

async fn visit(store: &Store, device: Option<&str>, path: &str) {
    store
        .record_visit(&NewVisit {
            path: path.to_string(),
            device_type: device.map(str::to_string),
            platform: None,
            browser: None,
            user_id: None,
            session_id: "s1".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_every_result_satisfies_all_filters() {
    let store = spawn_store().await;

    store.create_listing(&listing("Trek", 85000)).await.unwrap();
    store
        .create_listing(&NewListing {
            condition: Condition::LikeNew,
            purchase_year: 2021,
            ..listing("Trek", 60000)
        })
        .await
        .unwrap();
    store.create_listing(&listing("Giant", 40000)).await.unwrap();
    store
        .create_listing(&NewListing {
            category: Category::Kids,
            wheel_size: WheelSize::W16,
            ..listing("Firefox", 8000)
        })
        .await
        .unwrap();

    let filter = ListingFilter {
        brand: Some("Trek".to_string()),
        min_price: Some(50000),
        max_price: Some(90000),
        condition: Some(Condition::Good),
        category: Some(Category::Adult),
        ..Default::default()
    };

    let results = store
        .search_listings(&filter, SortKey::Newest)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    for found in &results {
        assert_eq!(found.brand, "Trek");
        assert!((50000..=90000).contains(&found.price));
        assert_eq!(found.condition, Condition::Good);
        assert_eq!(found.category, Category::Adult);
    }
}

#[tokio::test]
async fn test_price_bounds_are_inclusive() {
    let store = spawn_store().await;
    store.create_listing(&listing("Trek", 50000)).await.unwrap();

    let filter = ListingFilter {
        min_price: Some(50000),
        max_price: Some(50000),
        ..Default::default()
    };
    let results = store
        .search_listings(&filter, SortKey::Newest)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_empty_filter_returns_everything() {
    let store = spawn_store().await;
    for i in 0..5 {
        store
            .create_listing(&listing("Brand", 1000 * (i + 1)))
            .await
            .unwrap();
    }

    let results = store
        .search_listings(&ListingFilter::default(), SortKey::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn test_sort_orderings() {
    let store = spawn_store().await;
    for price in [85000, 40000, 62000] {
        store.create_listing(&listing("Brand", price)).await.unwrap();
        // Distinct creation timestamps keep the newest ordering stable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let asc = store
        .search_listings(&ListingFilter::default(), SortKey::PriceAsc)
        .await
        .unwrap();
    assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));

    let desc = store
        .search_listings(&ListingFilter::default(), SortKey::PriceDesc)
        .await
        .unwrap();
    assert!(desc.windows(2).all(|w| w[0].price >= w[1].price));

    let newest = store
        .search_listings(&ListingFilter::default(), SortKey::Newest)
        .await
        .unwrap();
    assert!(
        newest
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );

    // Relevance is defined as newest.
    let relevance = store
        .search_listings(&ListingFilter::default(), SortKey::Relevance)
        .await
        .unwrap();
    let newest_ids: Vec<i32> = newest.iter().map(|l| l.id).collect();
    let relevance_ids: Vec<i32> = relevance.iter().map(|l| l.id).collect();
    assert_eq!(newest_ids, relevance_ids);
}

#[tokio::test]
async fn test_id_list_and_seller_filters() {
    let store = spawn_store().await;
    let a = store.create_listing(&listing("Trek", 10000)).await.unwrap();
    let b = store.create_listing(&listing("Giant", 20000)).await.unwrap();
    let c = store
        .create_listing(&NewListing {
            seller_id: 2,
            ..listing("Scott", 30000)
        })
        .await
        .unwrap();

    let filter = ListingFilter {
        ids: Some(vec![a.id, c.id]),
        ..Default::default()
    };
    let results = store
        .search_listings(&filter, SortKey::PriceAsc)
        .await
        .unwrap();
    let ids: Vec<i32> = results.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![a.id, c.id]);

    let filter = ListingFilter {
        seller_id: Some(2),
        ..Default::default()
    };
    let results = store
        .search_listings(&filter, SortKey::Newest)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, c.id);
    assert_ne!(results[0].id, b.id);
}

#[tokio::test]
async fn test_status_update_mutates_only_status() {
    let store = spawn_store().await;
    let created = store.create_listing(&listing("Trek", 85000)).await.unwrap();
    assert_eq!(created.status, ListingStatus::Available);

    let updated = store
        .update_listing_status(created.id, ListingStatus::Reserved)
        .await
        .unwrap();
    assert!(updated);

    let fetched = store.get_listing(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ListingStatus::Reserved);
    assert_eq!(fetched.price, created.price);
    assert_eq!(fetched.brand, created.brand);
    assert_eq!(fetched.created_at, created.created_at);

    // Missing listings signal absence, not an error.
    assert!(!store
        .update_listing_status(999, ListingStatus::Sold)
        .await
        .unwrap());
    assert!(store.get_listing(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_counters_increment() {
    let store = spawn_store().await;
    let created = store.create_listing(&listing("Trek", 85000)).await.unwrap();

    store.increment_listing_views(created.id).await.unwrap();
    store.increment_listing_views(created.id).await.unwrap();
    assert!(store
        .increment_listing_inquiries(created.id)
        .await
        .unwrap());

    let fetched = store.get_listing(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.views, 2);
    assert_eq!(fetched.inquiries, 1);
}

#[tokio::test]
async fn test_analytics_counts_sum_to_total() {
    let store = spawn_store().await;

    visit(&store, Some("Mobile"), "/").await;
    visit(&store, Some("Mobile"), "/kids").await;
    visit(&store, Some("Desktop"), "/").await;
    visit(&store, None, "/premium").await;

    let buckets = store
        .aggregate_visits(None, None, VisitDimension::Device)
        .await
        .unwrap();

    let total: i64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total as u64, store.count_visits(None, None).await.unwrap());

    let mobile = buckets.iter().find(|b| b.label == "Mobile").unwrap();
    assert_eq!(mobile.count, 2);

    let unknown = buckets.iter().find(|b| b.label == "Unknown").unwrap();
    assert_eq!(unknown.count, 1);

    // Grouping by path never produces Unknown since every visit has a path.
    let by_path = store
        .aggregate_visits(None, None, VisitDimension::Path)
        .await
        .unwrap();
    assert_eq!(by_path.len(), 3);
    assert!(by_path.iter().all(|b| b.label != "Unknown"));
    assert_eq!(by_path.iter().map(|b| b.count).sum::<i64>(), 4);
}

#[tokio::test]
async fn test_analytics_time_window_is_inclusive() {
    let store = spawn_store().await;

    // Backdated rows inserted directly to control the timestamps.
    for (recorded_at, device) in [
        ("2026-03-01T10:00:00+00:00", "Mobile"),
        ("2026-03-02T10:00:00+00:00", "Desktop"),
        ("2026-03-05T10:00:00+00:00", "Desktop"),
    ] {
        cyclery::entities::visits::ActiveModel {
            recorded_at: Set(recorded_at.to_string()),
            path: Set("/".to_string()),
            device_type: Set(Some(device.to_string())),
            platform: Set(None),
            browser: Set(None),
            user_id: Set(None),
            session_id: Set("s1".to_string()),
            ..Default::default()
        }
        .insert(&store.conn)
        .await
        .unwrap();
    }

    let buckets = store
        .aggregate_visits(
            Some("2026-03-01T10:00:00+00:00"),
            Some("2026-03-02T10:00:00+00:00"),
            VisitDimension::Device,
        )
        .await
        .unwrap();
    assert_eq!(buckets.iter().map(|b| b.count).sum::<i64>(), 2);

    let buckets = store
        .aggregate_visits(Some("2026-03-03T00:00:00+00:00"), None, VisitDimension::Device)
        .await
        .unwrap();
    assert_eq!(buckets.iter().map(|b| b.count).sum::<i64>(), 1);

    let buckets = store
        .aggregate_visits(None, None, VisitDimension::Device)
        .await
        .unwrap();
    assert_eq!(buckets.iter().map(|b| b.count).sum::<i64>(), 3);
}

#[tokio::test]
async fn test_faq_listing_order_and_category() {
    let store = spawn_store().await;

    store.create_faq("Q3", "A3", "buying", 3).await.unwrap();
    store.create_faq("Q1", "A1", "selling", 1).await.unwrap();
    store.create_faq("Q2", "A2", "buying", 2).await.unwrap();

    let all = store.list_faqs(None).await.unwrap();
    let orders: Vec<i32> = all.iter().map(|f| f.display_order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let buying = store.list_faqs(Some("buying")).await.unwrap();
    assert_eq!(buying.len(), 2);
    assert!(buying.iter().all(|f| f.category == "buying"));

    let faq = &all[0];
    let deleted = store.soft_delete_faq(faq.id).await.unwrap();
    assert!(deleted);

    // Gone from the public list, still present for admins.
    assert_eq!(store.list_faqs(None).await.unwrap().len(), 2);
    assert_eq!(store.list_all_faqs().await.unwrap().len(), 3);
    assert!(!store.get_faq(faq.id).await.unwrap().unwrap().is_active);
}
