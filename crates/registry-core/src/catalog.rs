//! Gift Catalog Helpers
//!
//! Filtering and progress figures for the gift list.

use crate::domain::GiftItem;

/// Filter chips above the gift grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum GiftFilter {
    #[default]
    All,
    Available,
    Purchased,
}

impl GiftFilter {
    pub const ALL: [GiftFilter; 3] = [GiftFilter::All, GiftFilter::Available, GiftFilter::Purchased];

    pub fn label(&self) -> &'static str {
        match self {
            GiftFilter::All => "Todos",
            GiftFilter::Available => "Disponíveis",
            GiftFilter::Purchased => "Comprados",
        }
    }

    pub fn matches(&self, gift: &GiftItem) -> bool {
        match self {
            GiftFilter::All => true,
            GiftFilter::Available => !gift.purchased,
            GiftFilter::Purchased => gift.purchased,
        }
    }

    pub fn apply(&self, gifts: &[GiftItem]) -> Vec<GiftItem> {
        gifts.iter().filter(|g| self.matches(g)).cloned().collect()
    }
}

/// How much of the list has been claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub purchased: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(gifts: &[GiftItem]) -> Self {
        Self {
            purchased: gifts.iter().filter(|g| g.purchased).count(),
            total: gifts.len(),
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.purchased as f64 / self.total as f64 * 100.0
        }
    }

    pub fn rounded_percent(&self) -> u32 {
        self.percent().round() as u32
    }

    /// "3 de 6 presentes"
    pub fn summary(&self) -> String {
        format!("{} de {} presentes", self.purchased, self.total)
    }
}

/// "R$ 350.00"
pub fn format_price(price: f64) -> String {
    format!("R$ {:.2}", price)
}
