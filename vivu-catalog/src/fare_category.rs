use serde::{Deserialize, Serialize};
use vivu_shared::Vnd;

/// A sellable fare class (economy, business, VIP sleeper...) on one service item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FareCategory {
    pub id: String,
    /// Surcharge over the base fare, per passenger.
    #[serde(default, alias = "price_delta")]
    pub base_price_delta: Vnd,
    /// Seats remaining in this category.
    #[serde(alias = "available_seats")]
    pub available_units: u32,
}

impl FareCategory {
    pub fn new(id: impl Into<String>, base_price_delta: Vnd, available_units: u32) -> Self {
        Self {
            id: id.into(),
            base_price_delta,
            available_units,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_units == 0
    }

    /// Reject a sold-out category.
    pub fn ensure_selectable(&self) -> Result<(), CategoryError> {
        if self.is_sold_out() {
            return Err(CategoryError::SoldOut(self.id.clone()));
        }
        Ok(())
    }
}

/// The fare categories offered on one service item, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FareCategoryBoard {
    categories: Vec<FareCategory>,
}

impl FareCategoryBoard {
    pub fn new(categories: Vec<FareCategory>) -> Self {
        Self { categories }
    }

    pub fn get(&self, id: &str) -> Option<&FareCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category the customer wants to switch to.
    pub fn select(&self, id: &str) -> Result<&FareCategory, CategoryError> {
        let category = self.get(id).ok_or_else(|| CategoryError::NotFound(id.to_string()))?;
        category.ensure_selectable()?;
        Ok(category)
    }

    /// First category that still has seats, used as the initial selection.
    pub fn default_selection(&self) -> Option<&FareCategory> {
        self.categories.iter().find(|c| !c.is_sold_out())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Fare category not found: {0}")]
    NotFound(String),

    #[error("Fare category {0} is sold out")]
    SoldOut(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> FareCategoryBoard {
        FareCategoryBoard::new(vec![
            FareCategory::new("economy", 0, 0),
            FareCategory::new("premium", 600_000, 4),
            FareCategory::new("business", 2_500_000, 2),
        ])
    }

    #[test]
    fn test_select_category() {
        let board = board();

        assert_eq!(board.select("premium").unwrap().base_price_delta, 600_000);
        assert_eq!(board.select("economy"), Err(CategoryError::SoldOut("economy".to_string())));
        assert_eq!(board.select("first"), Err(CategoryError::NotFound("first".to_string())));
        assert_eq!(board.default_selection().unwrap().id, "premium");
    }

    #[test]
    fn test_deserialize_backend_seat_class() {
        let category: FareCategory = serde_json::from_value(serde_json::json!({
            "id": "economy",
            "price_delta": 0,
            "available_seats": 42
        }))
        .unwrap();

        assert_eq!(category, FareCategory::new("economy", 0, 42));
    }
}
