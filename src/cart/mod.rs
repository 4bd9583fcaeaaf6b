//! Guest cart and wishlist storage, and the gateway that puts them behind
//! the backend.

pub mod gateway;
pub mod postgres;
pub mod service;
pub mod store;

pub use gateway::{CartGateway, WishlistGateway};
pub use postgres::PgCartStore;
pub use service::GuestLists;
pub use store::{CartStore, ListKind, MemoryCartStore, StoreError, StoreKey};
