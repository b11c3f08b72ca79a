//! Bulk menu import
//!
//! Takes pre-parsed rows (CSV/Excel parsing happens upstream), validates
//! each independently, and upserts into the catalog. One bad row never
//! aborts the batch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{
    CategoryCreate, CustomizationGroup, MenuItemCreate, MenuItemUpdate, SelectionRule,
};
use crate::db::repository::{CategoryRepository, MenuItemRepository, RepoError};
use crate::utils::AppError;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PRICE};

/// One pre-parsed import row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItemRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    /// Category referenced by name; created on import if missing
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub customization_groups: Vec<CustomizationGroup>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Duplicate handling switches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ImportOptions {
    /// Silently skip rows whose (name, category) already exists
    #[serde(default)]
    pub skip_duplicates: bool,
    /// Fully replace existing items instead of skipping
    #[serde(default)]
    pub overwrite: bool,
}

/// A rejected row with a human-readable reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordError {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Result of a dry-run validation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchValidation {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<RecordError>,
}

/// Result of an import run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportReport {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Names of newly created items
    pub created: Vec<String>,
    /// Names of overwritten items
    pub updated: Vec<String>,
    pub errors: Vec<RecordError>,
}

/// Validate a single row; the reason is shown to the person importing
fn validate_record(record: &RawItemRecord) -> Result<(), String> {
    if record.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if record.name.len() > MAX_NAME_LEN {
        return Err(format!("name is too long (max {MAX_NAME_LEN} chars)"));
    }
    if record.description.trim().is_empty() {
        return Err("description must not be empty".to_string());
    }
    if record.description.len() > MAX_NOTE_LEN {
        return Err(format!("description is too long (max {MAX_NOTE_LEN} chars)"));
    }
    let price = record.price.ok_or("price is required")?;
    if price <= Decimal::ZERO {
        return Err(format!("price must be greater than 0, got {price}"));
    }
    if price > MAX_PRICE {
        return Err(format!("price exceeds maximum allowed ({MAX_PRICE})"));
    }
    if record.category.trim().is_empty() {
        return Err("category must not be empty".to_string());
    }
    for group in &record.customization_groups {
        if group.name.trim().is_empty() {
            return Err("customization group name must not be empty".to_string());
        }
        if group.options.is_empty() {
            return Err(format!(
                "customization group '{}' needs at least one option",
                group.name
            ));
        }
        if let SelectionRule::Multi { max_selections } = group.selection
            && max_selections == 0
        {
            return Err(format!(
                "customization group '{}' has a zero selection limit",
                group.name
            ));
        }
        for option in &group.options {
            if option.name.trim().is_empty() {
                return Err(format!(
                    "option in group '{}' has an empty name",
                    group.name
                ));
            }
            if option.price_delta.is_sign_negative() {
                return Err(format!(
                    "option '{}' has a negative price delta",
                    option.name
                ));
            }
        }
    }
    Ok(())
}

/// Dry-run validation: no writes, full per-row report
pub fn validate_batch(records: &[RawItemRecord]) -> BatchValidation {
    let mut errors = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if let Err(reason) = validate_record(record) {
            errors.push(RecordError {
                index,
                name: record.name.clone(),
                reason,
            });
        }
    }
    BatchValidation {
        total: records.len(),
        valid: records.len() - errors.len(),
        invalid: errors.len(),
        errors,
    }
}

/// Import a batch of rows
///
/// Rows are processed in order and independently: a failed row is recorded
/// under `errors` and the run continues. Duplicate identity is the
/// case-insensitive (name, category) pair.
pub async fn import_batch(
    state: &ServerState,
    records: Vec<RawItemRecord>,
    options: ImportOptions,
) -> Result<ImportReport, AppError> {
    let category_repo = CategoryRepository::new(state.get_db());
    let item_repo = MenuItemRepository::new(state.get_db());

    let mut report = ImportReport::default();

    for (index, record) in records.into_iter().enumerate() {
        if let Err(reason) = validate_record(&record) {
            report.failed += 1;
            report.errors.push(RecordError {
                index,
                name: record.name,
                reason,
            });
            continue;
        }

        match import_record(&category_repo, &item_repo, &record, options).await {
            Ok(RecordOutcome::Created) => {
                report.successful += 1;
                report.created.push(record.name);
            }
            Ok(RecordOutcome::Updated) => {
                report.successful += 1;
                report.updated.push(record.name);
            }
            Ok(RecordOutcome::Skipped) => {
                report.skipped += 1;
            }
            Err(err) => {
                report.failed += 1;
                report.errors.push(RecordError {
                    index,
                    name: record.name,
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        successful = report.successful,
        failed = report.failed,
        skipped = report.skipped,
        "menu import finished"
    );
    Ok(report)
}

enum RecordOutcome {
    Created,
    Updated,
    Skipped,
}

async fn import_record(
    category_repo: &CategoryRepository,
    item_repo: &MenuItemRepository,
    record: &RawItemRecord,
    options: ImportOptions,
) -> Result<RecordOutcome, RepoError> {
    // Resolve the category by name, creating it on first use
    let category = match category_repo.find_by_name(&record.category).await? {
        Some(c) => c,
        None => {
            category_repo
                .create(CategoryCreate {
                    name: record.category.trim().to_string(),
                    sort_order: None,
                })
                .await?
        }
    };
    let category_id = category
        .id
        .clone()
        .ok_or_else(|| RepoError::Database("Category record missing id".to_string()))?;

    let price = record.price.unwrap_or_default();
    let existing = item_repo
        .find_by_name_in_category(&record.name, &category_id)
        .await?;

    match existing {
        Some(found) => {
            if options.overwrite {
                let id = found
                    .id
                    .as_ref()
                    .map(|i| i.to_string())
                    .ok_or_else(|| RepoError::Database("Item record missing id".to_string()))?;
                item_repo
                    .update(
                        &id,
                        MenuItemUpdate {
                            name: Some(record.name.trim().to_string()),
                            description: Some(record.description.clone()),
                            price: Some(price),
                            category: Some(category_id),
                            image_url: record.image_url.clone(),
                            allergens: Some(record.allergens.clone()),
                            dietary_tags: Some(record.dietary_tags.clone()),
                            customization_groups: Some(record.customization_groups.clone()),
                            sort_order: None,
                            is_available: Some(record.is_available),
                            is_active: Some(true),
                        },
                    )
                    .await?;
                Ok(RecordOutcome::Updated)
            } else if options.skip_duplicates {
                Ok(RecordOutcome::Skipped)
            } else {
                Err(RepoError::Duplicate(format!(
                    "Menu item '{}' already exists in category '{}'",
                    record.name, category.name
                )))
            }
        }
        None => {
            item_repo
                .create(MenuItemCreate {
                    name: record.name.trim().to_string(),
                    description: Some(record.description.clone()),
                    price,
                    category: category_id,
                    image_url: record.image_url.clone(),
                    allergens: record.allergens.clone(),
                    dietary_tags: record.dietary_tags.clone(),
                    customization_groups: record.customization_groups.clone(),
                    sort_order: None,
                    is_available: Some(record.is_available),
                })
                .await?;
            Ok(RecordOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, price: &str, category: &str) -> RawItemRecord {
        RawItemRecord {
            name: name.to_string(),
            description: "House specialty".to_string(),
            price: price.parse().ok(),
            category: category.to_string(),
            allergens: vec![],
            dietary_tags: vec![],
            customization_groups: vec![],
            image_url: None,
            is_available: true,
        }
    }

    #[test]
    fn test_validate_batch_reports_each_bad_row() {
        let records = vec![
            record("Margherita Pizza", "10.50", "Mains"),
            record("", "5.00", "Mains"),
            record("Tiramisu", "-2.00", "Desserts"),
            record("Espresso", "2.50", ""),
        ];

        let result = validate_batch(&records);
        assert_eq!(result.total, 4);
        assert_eq!(result.valid, 1);
        assert_eq!(result.invalid, 3);
        assert_eq!(result.errors[0].index, 1);
        assert!(result.errors[0].reason.contains("name"));
        assert!(result.errors[1].reason.contains("price"));
        assert!(result.errors[2].reason.contains("category"));
    }

    #[test]
    fn test_validate_requires_price() {
        let mut r = record("Soup", "x", "Starters");
        r.price = None;
        let result = validate_batch(&[r]);
        assert_eq!(result.invalid, 1);
        assert!(result.errors[0].reason.contains("required"));
    }

    #[test]
    fn test_validate_customization_groups() {
        let mut r = record("Pizza", "10.00", "Mains");
        r.customization_groups = vec![CustomizationGroup {
            name: "Crust".to_string(),
            selection: SelectionRule::Single,
            required: false,
            options: vec![],
        }];
        let result = validate_batch(&[r]);
        assert_eq!(result.invalid, 1);
        assert!(result.errors[0].reason.contains("at least one option"));
    }

    #[test]
    fn test_validate_multi_selection_limit() {
        use crate::db::models::CustomizationOption;
        use rust_decimal::Decimal;

        let mut r = record("Pizza", "10.00", "Mains");
        r.customization_groups = vec![CustomizationGroup {
            name: "Toppings".to_string(),
            selection: SelectionRule::Multi { max_selections: 0 },
            required: false,
            options: vec![CustomizationOption {
                name: "Olives".to_string(),
                price_delta: Decimal::ZERO,
            }],
        }];
        let result = validate_batch(&[r]);
        assert_eq!(result.invalid, 1);
        assert!(result.errors[0].reason.contains("selection limit"));
    }
}
