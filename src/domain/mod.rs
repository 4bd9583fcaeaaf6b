//! Storefront domain: facets, catalog records, guest lists, events.
pub mod value_objects;
pub mod aggregates;
pub mod events;
