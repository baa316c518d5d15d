//! Wedding Info
//!
//! Singleton record with the couple's names and contact details.

use serde::{Deserialize, Serialize};

use super::entity::{id_from_text_or_number, Entity};

/// Contact and hero details shown on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeddingInfo {
    pub couple: String,
    pub date: String,
    pub message: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Pix key for guests who prefer to give money
    #[serde(default)]
    pub pix_key: Option<String>,
}

impl Default for WeddingInfo {
    /// Placeholder shown until the row loads, or when none exists
    fn default() -> Self {
        Self {
            couple: "Ana & João".to_string(),
            date: "15 de Março de 2026".to_string(),
            message: "Estamos muito felizes em compartilhar esse momento com vocês! \
                      Aqui está nossa lista de presentes para nos ajudar a começar essa nova etapa juntos. 💕"
                .to_string(),
            phone: "(11) 99999-9999".to_string(),
            email: "ana.joao@email.com".to_string(),
            address: "Rua das Flores, 123 - São Paulo, SP".to_string(),
            pix_key: Some("ana.joao@email.com".to_string()),
        }
    }
}

impl WeddingInfo {
    pub fn pix_key(&self) -> Option<&str> {
        self.pix_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// `wedding_info` row: the info plus its row id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeddingInfoRecord {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub info: WeddingInfo,
}

impl Entity for WeddingInfoRecord {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Partial update of the wedding info.
///
/// `pix_key: Some(None)` clears the key; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeddingInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<Option<String>>,
}

impl WeddingInfoPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto `base`, returning the updated info
    pub fn apply(&self, base: &WeddingInfo) -> WeddingInfo {
        let pick = |field: &Option<String>, current: &String| {
            field.clone().unwrap_or_else(|| current.clone())
        };
        WeddingInfo {
            couple: pick(&self.couple, &base.couple),
            date: pick(&self.date, &base.date),
            message: pick(&self.message, &base.message),
            phone: pick(&self.phone, &base.phone),
            email: pick(&self.email, &base.email),
            address: pick(&self.address, &base.address),
            pix_key: match &self.pix_key {
                Some(key) => key.clone(),
                None => base.pix_key.clone(),
            },
        }
    }

    /// Patch holding only the fields where `next` differs from `base`
    pub fn diff(base: &WeddingInfo, next: &WeddingInfo) -> Self {
        let changed = |a: &String, b: &String| (a != b).then(|| b.clone());
        Self {
            couple: changed(&base.couple, &next.couple),
            date: changed(&base.date, &next.date),
            message: changed(&base.message, &next.message),
            phone: changed(&base.phone, &next.phone),
            email: changed(&base.email, &next.email),
            address: changed(&base.address, &next.address),
            pix_key: (base.pix_key != next.pix_key).then(|| next.pix_key.clone()),
        }
    }
}
