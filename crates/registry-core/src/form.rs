//! Form Validation
//!
//! Turns raw text typed into the page forms into domain values.
//! Error messages are shown to visitors as-is.

use thiserror::Error;

use crate::domain::{NewGift, WeddingInfo, WeddingInfoPatch};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Informe o nome do presente!")]
    MissingGiftName,

    #[error("Preço inválido: {0}")]
    InvalidPrice(String),

    #[error("Por favor, informe seu nome!")]
    MissingBuyerName,

    #[error("Preencha e-mail e senha!")]
    MissingCredentials,

    #[error("Informe o nome do casal!")]
    MissingCouple,
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw fields of the "new gift" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub link: String,
    pub image: String,
}

impl GiftDraft {
    pub fn validate(&self) -> Result<NewGift, ValidationError> {
        let name = optional(&self.name).ok_or(ValidationError::MissingGiftName)?;
        Ok(NewGift {
            name,
            description: optional(&self.description),
            price: parse_price(&self.price)?,
            link: optional(&self.link),
            image: optional(&self.image),
        })
    }
}

/// Parse a price typed as "350", "350.5" or "350,50"
pub fn parse_price(raw: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::InvalidPrice(trimmed.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidPrice(trimmed.to_string()));
    }
    Ok(Some(value))
}

/// Name typed in the "Vou presentear!" dialog
pub fn buyer_name(raw: &str) -> Result<String, ValidationError> {
    optional(raw).ok_or(ValidationError::MissingBuyerName)
}

/// Admin login form
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Raw fields of the admin info editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoDraft {
    pub couple: String,
    pub date: String,
    pub message: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pix_key: String,
}

impl From<&WeddingInfo> for InfoDraft {
    fn from(info: &WeddingInfo) -> Self {
        Self {
            couple: info.couple.clone(),
            date: info.date.clone(),
            message: info.message.clone(),
            phone: info.phone.clone(),
            email: info.email.clone(),
            address: info.address.clone(),
            pix_key: info.pix_key.clone().unwrap_or_default(),
        }
    }
}

impl InfoDraft {
    /// Patch against `current` containing only the edited fields
    pub fn validate(&self, current: &WeddingInfo) -> Result<WeddingInfoPatch, ValidationError> {
        let couple = optional(&self.couple).ok_or(ValidationError::MissingCouple)?;
        let next = WeddingInfo {
            couple,
            date: self.date.trim().to_string(),
            message: self.message.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            pix_key: optional(&self.pix_key),
        };
        Ok(WeddingInfoPatch::diff(current, &next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gift_draft_trims_and_drops_empty_fields() {
        let draft = GiftDraft {
            name: "  Cafeteira Elétrica ".to_string(),
            description: "   ".to_string(),
            price: "450".to_string(),
            link: " https://loja.example/cafeteira ".to_string(),
            image: String::new(),
        };
        let gift = draft.validate().unwrap();
        assert_eq!(gift.name, "Cafeteira Elétrica");
        assert!(gift.description.is_none());
        assert_eq!(gift.price, Some(450.0));
        assert_eq!(gift.link.as_deref(), Some("https://loja.example/cafeteira"));
    }

    #[test]
    fn test_gift_draft_requires_name() {
        let draft = GiftDraft {
            name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingGiftName));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(""), Ok(None));
        assert_eq!(parse_price("99,90"), Ok(Some(99.9)));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn test_buyer_name() {
        assert_eq!(buyer_name(" Tia Rosa "), Ok("Tia Rosa".to_string()));
        assert_eq!(buyer_name(""), Err(ValidationError::MissingBuyerName));
    }

    #[test]
    fn test_credentials_require_both_fields() {
        assert!(Credentials::new("admin@example.com", "").is_err());
        assert!(Credentials::new(" ", "secret").is_err());
        let creds = Credentials::new(" admin@example.com ", "secret").unwrap();
        assert_eq!(creds.email, "admin@example.com");
    }

    #[test]
    fn test_info_draft_yields_minimal_patch() {
        let current = WeddingInfo::default();
        let mut draft = InfoDraft::from(&current);
        draft.phone = " (11) 91234-5678 ".to_string();
        draft.pix_key = String::new();

        let patch = draft.validate(&current).unwrap();
        assert_eq!(patch.phone.as_deref(), Some("(11) 91234-5678"));
        assert_eq!(patch.pix_key, Some(None));
        assert!(patch.couple.is_none());
    }

    #[test]
    fn test_info_draft_requires_couple() {
        let current = WeddingInfo::default();
        let mut draft = InfoDraft::from(&current);
        draft.couple = String::new();
        assert_eq!(draft.validate(&current), Err(ValidationError::MissingCouple));
    }
}
