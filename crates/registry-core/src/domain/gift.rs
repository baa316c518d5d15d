//! Gift Entity
//!
//! A single entry of the couple's gift list.

use serde::{Deserialize, Serialize};

use super::entity::{id_from_text_or_number, DomainError, DomainResult, Entity};

/// Gift row as stored in the `gifts` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftItem {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub purchased: bool,
    /// Only meaningful while `purchased` is true
    #[serde(default)]
    pub purchased_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl GiftItem {
    /// Build an available gift from admin input
    pub fn new(id: impl Into<String>, gift: NewGift) -> Self {
        Self {
            id: id.into(),
            name: gift.name,
            description: gift.description,
            price: gift.price,
            link: gift.link,
            image: gift.image,
            purchased: false,
            purchased_by: None,
            created_at: None,
        }
    }

    /// Drop a purchaser left on a gift that is not purchased
    pub fn normalized(mut self) -> Self {
        if !self.purchased {
            self.purchased_by = None;
        }
        self
    }

    /// Flip the purchased flag.
    ///
    /// Becoming purchased records the trimmed buyer name, which must not be
    /// empty. Becoming available again clears the purchaser.
    pub fn toggled(&self, buyer: &str) -> DomainResult<Self> {
        let mut next = self.clone();
        if self.purchased {
            next.purchased = false;
            next.purchased_by = None;
        } else {
            let buyer = buyer.trim();
            if buyer.is_empty() {
                return Err(DomainError::MissingBuyer);
            }
            next.purchased = true;
            next.purchased_by = Some(buyer.to_string());
        }
        Ok(next)
    }

    /// Purchaser shown on the card, if any
    pub fn purchaser(&self) -> Option<&str> {
        if self.purchased {
            self.purchased_by.as_deref().filter(|name| !name.is_empty())
        } else {
            None
        }
    }

    /// Price worth displaying (zero and missing prices are hidden)
    pub fn display_price(&self) -> Option<f64> {
        self.price.filter(|p| *p > 0.0)
    }
}

impl Entity for GiftItem {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Fields an administrator enters for a new gift
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGift {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gift() -> GiftItem {
        GiftItem::new(
            "g1",
            NewGift {
                name: "Air Fryer".to_string(),
                price: Some(550.0),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_gift_is_available() {
        let g = gift();
        assert_eq!(g.id(), "g1");
        assert!(!g.purchased);
        assert!(g.purchased_by.is_none());
    }

    #[test]
    fn test_toggle_records_trimmed_buyer() {
        let bought = gift().toggled("  Maria ").unwrap();
        assert!(bought.purchased);
        assert_eq!(bought.purchased_by.as_deref(), Some("Maria"));
        assert_eq!(bought.purchaser(), Some("Maria"));
    }

    #[test]
    fn test_toggle_back_clears_buyer() {
        let bought = gift().toggled("Maria").unwrap();
        let undone = bought.toggled("").unwrap();
        assert!(!undone.purchased);
        assert!(undone.purchased_by.is_none());
    }

    #[test]
    fn test_toggle_requires_buyer() {
        assert_eq!(gift().toggled("   "), Err(DomainError::MissingBuyer));
    }

    #[test]
    fn test_normalized_drops_stray_purchaser() {
        let mut g = gift();
        g.purchased_by = Some("ghost".to_string());
        assert!(g.purchaser().is_none());
        assert!(g.normalized().purchased_by.is_none());
    }

    #[test]
    fn test_row_deserialization() {
        let json = r#"{
            "id": "7f0c",
            "name": "Jogo de Toalhas",
            "description": null,
            "price": 180,
            "purchased": true,
            "purchased_by": "Carlos",
            "created_at": "2026-01-10T12:00:00+00:00"
        }"#;
        let g: GiftItem = serde_json::from_str(json).unwrap();
        assert_eq!(g.price, Some(180.0));
        assert_eq!(g.purchaser(), Some("Carlos"));
        assert!(g.link.is_none());
    }

    #[test]
    fn test_zero_price_is_hidden() {
        let mut g = gift();
        g.price = Some(0.0);
        assert!(g.display_price().is_none());
    }
}
