//! Bulk import against an in-memory database: duplicate handling,
//! auto-created categories, per-row independence.

use rust_decimal::Decimal;
use table_server::core::{Config, ServerState};
use table_server::db::repository::{CategoryRepository, MenuItemRepository};
use table_server::import::{self, ImportOptions, RawItemRecord};

async fn setup() -> ServerState {
    let config = Config::with_overrides("/tmp/tabletap-test", 0);
    ServerState::initialize_mem(&config).await.unwrap()
}

fn record(name: &str, price: &str, category: &str) -> RawItemRecord {
    RawItemRecord {
        name: name.to_string(),
        description: "Imported item".to_string(),
        price: price.parse().ok(),
        category: category.to_string(),
        allergens: vec![],
        dietary_tags: vec![],
        customization_groups: vec![],
        image_url: None,
        is_available: true,
    }
}

#[tokio::test]
async fn import_creates_items_and_missing_categories() {
    let state = setup().await;

    let report = import::import_batch(
        &state,
        vec![
            record("Margherita Pizza", "10.50", "Mains"),
            record("Tiramisu", "6.00", "Desserts"),
        ],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.created, vec!["Margherita Pizza", "Tiramisu"]);

    let categories = CategoryRepository::new(state.get_db());
    assert!(categories.find_by_name("mains").await.unwrap().is_some());
    assert!(categories.find_by_name("Desserts").await.unwrap().is_some());

    let items = MenuItemRepository::new(state.get_db());
    let all = items.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn duplicate_without_flags_fails_that_row_only() {
    let state = setup().await;

    import::import_batch(
        &state,
        vec![record("Espresso", "2.50", "Drinks")],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    let report = import::import_batch(
        &state,
        vec![
            record("Espresso", "3.00", "Drinks"),
            record("Latte", "3.50", "Drinks"),
        ],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.successful, 1);
    assert!(report.errors[0].reason.contains("already exists"));

    // The original row is untouched
    let items = MenuItemRepository::new(state.get_db());
    let all = items.find_all().await.unwrap();
    let espresso = all.iter().find(|i| i.name == "Espresso").unwrap();
    assert_eq!(espresso.price, Decimal::new(250, 2));
}

#[tokio::test]
async fn skip_duplicates_counts_skipped_rows() {
    let state = setup().await;

    import::import_batch(
        &state,
        vec![record("Espresso", "2.50", "Drinks")],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    let report = import::import_batch(
        &state,
        vec![
            record("Espresso", "9.99", "Drinks"),
            record("Latte", "3.50", "Drinks"),
        ],
        ImportOptions {
            skip_duplicates: true,
            overwrite: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn overwrite_replaces_existing_item() {
    let state = setup().await;

    import::import_batch(
        &state,
        vec![record("Espresso", "2.50", "Drinks")],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    let mut updated = record("Espresso", "3.00", "Drinks");
    updated.allergens = vec!["caffeine".into()];
    let report = import::import_batch(
        &state,
        vec![updated],
        ImportOptions {
            skip_duplicates: false,
            overwrite: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.updated, vec!["Espresso"]);

    let items = MenuItemRepository::new(state.get_db());
    let all = items.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].price, Decimal::new(300, 2));
    assert_eq!(all[0].allergens, vec!["caffeine"]);
}

#[tokio::test]
async fn duplicate_identity_is_case_insensitive_within_category() {
    let state = setup().await;

    import::import_batch(
        &state,
        vec![record("Margherita Pizza", "10.50", "Mains")],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    // Same name different case, same category -> duplicate
    let report = import::import_batch(
        &state,
        vec![record("MARGHERITA PIZZA", "12.00", "mains")],
        ImportOptions {
            skip_duplicates: true,
            overwrite: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(report.skipped, 1);

    // Same name, different category -> new item
    let report = import::import_batch(
        &state,
        vec![record("Margherita Pizza", "8.00", "Lunch Specials")],
        ImportOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(report.successful, 1);
}

#[tokio::test]
async fn bad_rows_never_abort_the_batch() {
    let state = setup().await;

    let report = import::import_batch(
        &state,
        vec![
            record("", "5.00", "Mains"),
            record("Minestrone", "7.00", "Starters"),
            record("Free Soup", "-1.00", "Starters"),
            record("Bruschetta", "6.50", "Starters"),
        ],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(report.errors[0].index, 0);
    assert_eq!(report.errors[1].index, 2);

    let items = MenuItemRepository::new(state.get_db());
    assert_eq!(items.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn category_item_count_sees_imported_items() {
    let state = setup().await;
    import::import_batch(
        &state,
        vec![
            record("Margherita Pizza", "10.50", "Mains"),
            record("Carbonara", "12.00", "Mains"),
        ],
        ImportOptions::default(),
    )
    .await
    .unwrap();

    let categories = CategoryRepository::new(state.get_db());
    let mains = categories.find_by_name("Mains").await.unwrap().unwrap();
    let count = categories
        .count_items(&mains.id.as_ref().unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(count, 2);
}
