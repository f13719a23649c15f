//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod category;
pub mod product;
pub mod supplier;

// Sales
pub mod customer;
pub mod invoice;
pub mod order;

// Inventory
pub mod stock_movement;

// System
pub mod settings;
pub mod user;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryUpdate, slugify};
pub use customer::{Customer, CustomerCreate, CustomerRef, CustomerStatus, CustomerUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceDetail, InvoiceStatus, InvoiceUpdate};
pub use order::{
    LineItem, LineItemDetail, Order, OrderCreate, OrderDetail, OrderStatus, OrderUpdate,
    PaymentStatus, SalesRow,
};
pub use product::{InventoryRow, Product, ProductCreate, ProductUpdate};
pub use settings::{Settings, SettingsUpdate};
pub use stock_movement::{
    MovementType, ProductRef, StockMovement, StockMovementCreate, StockMovementDetail,
};
pub use supplier::{Supplier, SupplierCreate, SupplierUpdate};
pub use user::{ProfileUpdate, User, UserPublic};
