//! Cart pricing engine
//!
//! All monetary arithmetic runs on `Decimal` end to end. Client-submitted
//! prices are never trusted: lines are priced against the live catalog via
//! [`price_line`], and every derived amount is rounded to 2 decimal places
//! half-up before leaving this module.

use rust_decimal::{Decimal, RoundingStrategy};
use sha2::{Digest, Sha256};
use shared::cart::{CartLineInput, PricedLine, SelectedOption, SelectionInput};
use shared::{AppError, ErrorCode};

use crate::db::models::{MenuItem, SelectionRule};
use crate::utils::validation::{MAX_QUANTITY, validate_tax_rate};

/// Monetary rounding: 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;
const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round a monetary amount to cents
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DECIMAL_PLACES, ROUNDING)
}

/// Stable line identity: hash of the item id plus the sorted selections
///
/// Two submissions of the same item with the same options always map to
/// the same line, so carts merge instead of duplicating.
pub fn line_id(menu_item: &str, selections: &[SelectionInput]) -> String {
    let mut sorted: Vec<&SelectionInput> = selections.iter().collect();
    sorted.sort();

    let mut hasher = Sha256::new();
    hasher.update(menu_item.as_bytes());
    for sel in sorted {
        hasher.update(b"|");
        hasher.update(sel.group.as_bytes());
        hasher.update(b"=");
        hasher.update(sel.option.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Price one cart line against the live menu item
///
/// Validates quantity bounds, item availability, and that every selection
/// names a real group and option. Required groups must be covered, and
/// each group's selection rule (single or bounded multi) is enforced.
pub fn price_line(item: &MenuItem, input: &CartLineInput) -> Result<PricedLine, AppError> {
    if input.quantity < 1 || input.quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidQuantity,
            format!(
                "quantity must be between 1 and {MAX_QUANTITY}, got {}",
                input.quantity
            ),
        ));
    }
    if !item.is_available || !item.is_active {
        return Err(AppError::with_message(
            ErrorCode::MenuItemUnavailable,
            format!("'{}' is currently unavailable", item.name),
        ));
    }

    let mut selections = Vec::with_capacity(input.selections.len());
    let mut unit_price = item.price;

    for sel in &input.selections {
        let group = item.find_group(&sel.group).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidCustomization,
                format!("'{}' has no customization group '{}'", item.name, sel.group),
            )
        })?;
        let option = group.find_option(&sel.option).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidCustomization,
                format!("group '{}' has no option '{}'", sel.group, sel.option),
            )
        })?;
        if selections
            .iter()
            .any(|s: &SelectedOption| s.group == sel.group && s.option == sel.option)
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidCustomization,
                format!("option '{}' selected twice in group '{}'", sel.option, sel.group),
            ));
        }
        unit_price += option.price_delta;
        selections.push(SelectedOption {
            group: group.name.clone(),
            option: option.name.clone(),
            price_delta: option.price_delta,
        });
    }

    for group in &item.customization_groups {
        let picked = selections.iter().filter(|s| s.group == group.name).count();
        if group.required && picked == 0 {
            return Err(AppError::with_message(
                ErrorCode::InvalidCustomization,
                format!("customization group '{}' is required", group.name),
            ));
        }
        match group.selection {
            SelectionRule::Single if picked > 1 => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidCustomization,
                    format!("group '{}' allows only one option", group.name),
                ));
            }
            SelectionRule::Multi { max_selections } if picked > max_selections as usize => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidCustomization,
                    format!(
                        "group '{}' allows at most {} options",
                        group.name, max_selections
                    ),
                ));
            }
            _ => {}
        }
    }

    let item_ref = item
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| input.menu_item.clone());

    let quantity = Decimal::from(input.quantity);
    Ok(PricedLine {
        line_id: line_id(&item_ref, &input.selections),
        menu_item: item_ref,
        name: item.name.clone(),
        unit_price: item.price,
        quantity: input.quantity,
        selections,
        allergen_preferences: input.allergen_preferences.clone(),
        line_total: round_money(unit_price * quantity),
    })
}

/// Recompute a line's total after a quantity change
fn retotal(line: &mut PricedLine) {
    let unit: Decimal = line.unit_price
        + line
            .selections
            .iter()
            .map(|s| s.price_delta)
            .sum::<Decimal>();
    line.line_total = round_money(unit * Decimal::from(line.quantity));
}

/// Cart totals after tax
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// In-memory cart aggregate
///
/// Lines are keyed by [`line_id`]; adding the same item with the same
/// selections merges quantities.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<PricedLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<PricedLine> {
        self.lines
    }

    /// Add a priced line, merging with an existing line of the same identity
    pub fn add_line(&mut self, line: PricedLine) -> Result<(), AppError> {
        match self.lines.iter_mut().find(|l| l.line_id == line.line_id) {
            Some(existing) => {
                let merged = existing
                    .quantity
                    .checked_add(line.quantity)
                    .filter(|q| *q <= MAX_QUANTITY)
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::OrderInvalidQuantity,
                            format!("quantity for '{}' exceeds {MAX_QUANTITY}", existing.name),
                        )
                    })?;
                existing.quantity = merged;
                retotal(existing);
            }
            None => self.lines.push(line),
        }
        Ok(())
    }

    /// Adjust a line's quantity by a signed delta; dropping to zero or
    /// below removes the line
    pub fn update_quantity(&mut self, line_id: &str, delta: i32) -> Result<(), AppError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.line_id == line_id)
            .ok_or_else(|| AppError::not_found(format!("cart line {line_id}")))?;
        let new_qty = line.quantity.saturating_add(delta);
        if new_qty <= 0 {
            self.lines.retain(|l| l.line_id != line_id);
            return Ok(());
        }
        self.apply_quantity(line_id, new_qty)
    }

    /// Set a line's quantity directly; zero and negative are rejected
    /// (removal is explicit via [`Cart::remove_line`])
    pub fn set_quantity(&mut self, line_id: &str, quantity: i32) -> Result<(), AppError> {
        if !self.lines.iter().any(|l| l.line_id == line_id) {
            return Err(AppError::not_found(format!("cart line {line_id}")));
        }
        self.apply_quantity(line_id, quantity)
    }

    fn apply_quantity(&mut self, line_id: &str, quantity: i32) -> Result<(), AppError> {
        if quantity < 1 || quantity > MAX_QUANTITY {
            return Err(AppError::with_message(
                ErrorCode::OrderInvalidQuantity,
                format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
            ));
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) {
            line.quantity = quantity;
            retotal(line);
        }
        Ok(())
    }

    /// Remove a line; returns whether it existed
    pub fn remove_line(&mut self, line_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    /// Sum of line totals, rounded to cents
    pub fn subtotal(&self) -> Decimal {
        round_money(self.lines.iter().map(|l| l.line_total).sum())
    }

    /// Subtotal, tax and grand total; the tax rate must be a fraction in [0, 1]
    pub fn totals(&self, tax_rate: Decimal) -> Result<CartTotals, AppError> {
        totals_for(self.subtotal(), tax_rate)
    }
}

/// Compute tax and total from an already-rounded subtotal
pub fn totals_for(subtotal: Decimal, tax_rate: Decimal) -> Result<CartTotals, AppError> {
    validate_tax_rate(tax_rate)?;
    let tax = round_money(subtotal * tax_rate);
    Ok(CartTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CustomizationGroup, CustomizationOption};
    use surrealdb::RecordId;

    fn item(name: &str, price: Decimal) -> MenuItem {
        MenuItem {
            id: Some(RecordId::from_table_key("menu_item", name.to_lowercase())),
            name: name.to_string(),
            name_key: name.to_lowercase(),
            description: String::new(),
            price,
            category: RecordId::from_table_key("category", "mains"),
            image_url: None,
            allergens: vec![],
            dietary_tags: vec![],
            customization_groups: vec![],
            sort_order: 0,
            is_available: true,
            is_active: true,
        }
    }

    fn item_with_crust(price: Decimal) -> MenuItem {
        let mut it = item("Margherita Pizza", price);
        it.customization_groups = vec![CustomizationGroup {
            name: "Crust Type".into(),
            selection: SelectionRule::Single,
            required: false,
            options: vec![
                CustomizationOption {
                    name: "Thin".into(),
                    price_delta: Decimal::ZERO,
                },
                CustomizationOption {
                    name: "Stuffed".into(),
                    price_delta: Decimal::new(200, 2),
                },
            ],
        }];
        it
    }

    fn item_with_toppings(price: Decimal, max_selections: u32) -> MenuItem {
        let mut it = item("Margherita Pizza", price);
        it.customization_groups = vec![CustomizationGroup {
            name: "Toppings".into(),
            selection: SelectionRule::Multi { max_selections },
            required: false,
            options: ["Olives", "Mushrooms", "Basil"]
                .into_iter()
                .map(|name| CustomizationOption {
                    name: name.into(),
                    price_delta: Decimal::new(50, 2),
                })
                .collect(),
        }];
        it
    }

    fn selection(group: &str, option: &str) -> SelectionInput {
        SelectionInput {
            group: group.into(),
            option: option.into(),
        }
    }

    fn input(menu_item: &str, quantity: i32) -> CartLineInput {
        CartLineInput {
            menu_item: menu_item.to_string(),
            quantity,
            selections: vec![],
            allergen_preferences: vec![],
        }
    }

    #[test]
    fn test_totals_at_eight_percent() {
        // $25.00 subtotal at 8% tax: $2.00 tax, $27.00 total
        let mut cart = Cart::new();
        let it = item("Set Menu", Decimal::new(1250, 2));
        cart.add_line(price_line(&it, &input("menu_item:set", 2)).unwrap())
            .unwrap();

        let totals = cart.totals(Decimal::new(8, 2)).unwrap();
        assert_eq!(totals.subtotal, Decimal::new(2500, 2));
        assert_eq!(totals.tax, Decimal::new(200, 2));
        assert_eq!(totals.total, Decimal::new(2700, 2));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.01 * 0.0825 = 0.825825 -> 0.83
        let totals = totals_for(Decimal::new(1001, 2), Decimal::new(825, 4)).unwrap();
        assert_eq!(totals.tax, Decimal::new(83, 2));
        assert_eq!(totals.total, Decimal::new(1084, 2));
    }

    #[test]
    fn test_zero_tax_rate() {
        let totals = totals_for(Decimal::new(2500, 2), Decimal::ZERO).unwrap();
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(2500, 2));
    }

    #[test]
    fn test_out_of_range_tax_rate_rejected() {
        assert!(totals_for(Decimal::new(2500, 2), Decimal::new(-50, 2)).is_err());
        assert!(totals_for(Decimal::new(2500, 2), Decimal::new(150, 2)).is_err());
        // Boundary rates are legal
        assert!(totals_for(Decimal::new(2500, 2), Decimal::ONE).is_ok());
    }

    #[test]
    fn test_selection_surcharge_applies_per_unit() {
        let it = item_with_crust(Decimal::new(1050, 2));
        let line_input = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 2,
            selections: vec![SelectionInput {
                group: "Crust Type".into(),
                option: "Stuffed".into(),
            }],
            allergen_preferences: vec![],
        };
        let line = price_line(&it, &line_input).unwrap();
        // (10.50 + 2.00) * 2 = 25.00
        assert_eq!(line.line_total, Decimal::new(2500, 2));
        assert_eq!(line.unit_price, Decimal::new(1050, 2));
        assert_eq!(line.selections[0].price_delta, Decimal::new(200, 2));
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let it = item_with_crust(Decimal::new(1050, 2));
        let line_input = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![SelectionInput {
                group: "Crust Type".into(),
                option: "Gluten Free".into(),
            }],
            allergen_preferences: vec![],
        };
        let err = price_line(&it, &line_input).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_required_group_enforced() {
        let mut it = item_with_crust(Decimal::new(1050, 2));
        it.customization_groups[0].required = true;
        let err = price_line(&it, &input("menu_item:margherita-pizza", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_single_choice_rejects_two_options() {
        let it = item_with_crust(Decimal::new(1050, 2));
        let line_input = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![
                selection("Crust Type", "Thin"),
                selection("Crust Type", "Stuffed"),
            ],
            allergen_preferences: vec![],
        };
        let err = price_line(&it, &line_input).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_multi_choice_bounded_by_max_selections() {
        let it = item_with_toppings(Decimal::new(1050, 2), 2);

        let within = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![
                selection("Toppings", "Olives"),
                selection("Toppings", "Basil"),
            ],
            allergen_preferences: vec![],
        };
        let line = price_line(&it, &within).unwrap();
        // 10.50 + 0.50 + 0.50
        assert_eq!(line.line_total, Decimal::new(1150, 2));

        let over = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![
                selection("Toppings", "Olives"),
                selection("Toppings", "Mushrooms"),
                selection("Toppings", "Basil"),
            ],
            allergen_preferences: vec![],
        };
        let err = price_line(&it, &over).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_duplicate_selection_rejected() {
        let it = item_with_toppings(Decimal::new(1050, 2), 3);
        let line_input = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![
                selection("Toppings", "Olives"),
                selection("Toppings", "Olives"),
            ],
            allergen_preferences: vec![],
        };
        let err = price_line(&it, &line_input).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCustomization);
    }

    #[test]
    fn test_unavailable_item_rejected() {
        let mut it = item("Soup", Decimal::new(500, 2));
        it.is_available = false;
        let err = price_line(&it, &input("menu_item:soup", 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);
    }

    #[test]
    fn test_quantity_bounds() {
        let it = item("Soup", Decimal::new(500, 2));
        assert_eq!(
            price_line(&it, &input("menu_item:soup", 0)).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );
        assert_eq!(
            price_line(&it, &input("menu_item:soup", 100)).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );
    }

    #[test]
    fn test_same_selections_merge() {
        let it = item("Soup", Decimal::new(500, 2));
        let mut cart = Cart::new();
        cart.add_line(price_line(&it, &input("menu_item:soup", 1)).unwrap())
            .unwrap();
        cart.add_line(price_line(&it, &input("menu_item:soup", 2)).unwrap())
            .unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.lines()[0].line_total, Decimal::new(1500, 2));
    }

    #[test]
    fn test_different_selections_stay_separate() {
        let it = item_with_crust(Decimal::new(1050, 2));
        let thin = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![SelectionInput {
                group: "Crust Type".into(),
                option: "Thin".into(),
            }],
            allergen_preferences: vec![],
        };
        let stuffed = CartLineInput {
            menu_item: "menu_item:margherita-pizza".into(),
            quantity: 1,
            selections: vec![SelectionInput {
                group: "Crust Type".into(),
                option: "Stuffed".into(),
            }],
            allergen_preferences: vec![],
        };

        let mut cart = Cart::new();
        cart.add_line(price_line(&it, &thin).unwrap()).unwrap();
        cart.add_line(price_line(&it, &stuffed).unwrap()).unwrap();
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_selection_order_does_not_change_identity() {
        let a = vec![
            SelectionInput {
                group: "Crust Type".into(),
                option: "Thin".into(),
            },
            SelectionInput {
                group: "Size".into(),
                option: "Large".into(),
            },
        ];
        let b = vec![a[1].clone(), a[0].clone()];
        assert_eq!(line_id("menu_item:p", &a), line_id("menu_item:p", &b));
    }

    #[test]
    fn test_set_quantity_rejects_zero_and_negative() {
        let it = item("Soup", Decimal::new(500, 2));
        let mut cart = Cart::new();
        let line = price_line(&it, &input("menu_item:soup", 2)).unwrap();
        let id = line.line_id.clone();
        cart.add_line(line).unwrap();

        assert_eq!(
            cart.set_quantity(&id, 0).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );
        assert_eq!(
            cart.set_quantity(&id, -1).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );
        // Line untouched by the rejected calls
        assert_eq!(cart.lines()[0].quantity, 2);

        cart.set_quantity(&id, 4).unwrap();
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.lines()[0].line_total, Decimal::new(2000, 2));
    }

    #[test]
    fn test_update_quantity_retotals() {
        let it = item("Soup", Decimal::new(500, 2));
        let mut cart = Cart::new();
        let line = price_line(&it, &input("menu_item:soup", 2)).unwrap();
        let id = line.line_id.clone();
        cart.add_line(line).unwrap();

        cart.update_quantity(&id, 3).unwrap();
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.lines()[0].line_total, Decimal::new(2500, 2));

        cart.update_quantity(&id, -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_line_errors() {
        let mut cart = Cart::new();
        assert!(cart.set_quantity("missing", 1).is_err());
        assert!(cart.update_quantity("missing", 1).is_err());
        assert!(!cart.remove_line("missing"));
    }
}
