//! Guest List Aggregate
//!
//! Unauthenticated carts and wishlists are flat lists of product ids. In a
//! cart an id repeats once per unit, so quantity is the repetition count.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestList { ids: Vec<String> }

/// One folded cart line: an id and how many times it appears.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestLine {
    pub product_id: String,
    pub quantity: u32,
}

impl GuestList {
    pub fn from_ids(ids: Vec<String>) -> Self { Self { ids } }
    pub fn ids(&self) -> &[String] { &self.ids }
    pub fn into_ids(self) -> Vec<String> { self.ids }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn total_units(&self) -> usize { self.ids.len() }
    pub fn contains(&self, product_id: &str) -> bool { self.ids.iter().any(|i| i == product_id) }
    pub fn quantity_of(&self, product_id: &str) -> u32 { self.ids.iter().filter(|i| *i == product_id).count() as u32 }

    /// Folds repeated ids into lines, ordered by first appearance.
    pub fn lines(&self) -> Vec<GuestLine> {
        let mut lines: Vec<GuestLine> = Vec::new();
        for id in &self.ids {
            match lines.iter_mut().find(|l| &l.product_id == id) {
                Some(line) => line.quantity += 1,
                None => lines.push(GuestLine { product_id: id.clone(), quantity: 1 }),
            }
        }
        lines
    }

    pub fn add(&mut self, product_id: &str, quantity: u32) {
        self.ids.extend(std::iter::repeat(product_id.to_string()).take(quantity as usize));
    }

    /// Adds the id once; wishlists never hold duplicates.
    pub fn add_unique(&mut self, product_id: &str) -> bool {
        if self.contains(product_id) { return false; }
        self.ids.push(product_id.to_string());
        true
    }

    /// Rewrites the id's occurrences so it appears `quantity` times, keeping
    /// its first position. Zero removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), GuestListError> {
        let first = self.ids.iter().position(|i| i == product_id).ok_or(GuestListError::ItemNotFound)?;
        self.ids.retain(|i| i != product_id);
        let copies = std::iter::repeat(product_id.to_string()).take(quantity as usize);
        self.ids.splice(first..first, copies);
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> Result<(), GuestListError> {
        let before = self.ids.len();
        self.ids.retain(|i| i != product_id);
        if self.ids.len() == before { return Err(GuestListError::ItemNotFound); }
        Ok(())
    }

    pub fn clear(&mut self) { self.ids.clear(); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum GuestListError { ItemNotFound }
impl std::error::Error for GuestListError {}
impl std::fmt::Display for GuestListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Item not found") }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_cart_operations() {
        let mut cart = GuestList::default();
        cart.add("P1", 2);
        cart.add("P2", 1);
        cart.add("P1", 1);
        assert_eq!(cart.total_units(), 4);
        assert_eq!(cart.lines(), vec![
            GuestLine { product_id: "P1".into(), quantity: 3 },
            GuestLine { product_id: "P2".into(), quantity: 1 },
        ]);
    }
    #[test]
    fn test_set_quantity_keeps_position() {
        let mut cart = GuestList::from_ids(vec!["A".into(), "B".into(), "A".into()]);
        cart.set_quantity("A", 1).unwrap();
        assert_eq!(cart.ids(), ["A".to_string(), "B".to_string()]);
        cart.set_quantity("A", 0).unwrap();
        assert_eq!(cart.ids(), ["B".to_string()]);
        assert_eq!(cart.set_quantity("Z", 2), Err(GuestListError::ItemNotFound));
    }
    #[test]
    fn test_wishlist_unique() {
        let mut list = GuestList::default();
        assert!(list.add_unique("W1"));
        assert!(!list.add_unique("W1"));
        assert!(list.remove("W1").is_ok());
        assert!(list.remove("W1").is_err());
    }
}
