//! Database Models

// Serde helpers
pub mod serde_helpers;

// Menu Catalog
pub mod category;
pub mod menu_item;

// Location
pub mod dining_table;

// Orders
pub mod order;

// Service Requests
pub mod service_request;

// System
pub mod store_info;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use menu_item::{
    CustomizationGroup, CustomizationOption, MenuItem, MenuItemCreate, MenuItemUpdate,
    SelectionRule,
};
pub use order::{Order, OrderCancel, OrderStatusUpdate};
pub use service_request::{ServiceRequest, ServiceRequestCreate, ServiceRequestStatusUpdate};
pub use store_info::{StoreInfo, StoreInfoUpdate};
