//! Domain Layer
//!
//! Registry entities and the invariants they keep.
//! No I/O happens here.

mod entity;
mod gift;
mod session;
mod wedding_info;

pub use entity::{DomainError, DomainResult, Entity};
pub use gift::{GiftItem, NewGift};
pub use session::{Role, Session, SessionUser};
pub use wedding_info::{WeddingInfo, WeddingInfoPatch, WeddingInfoRecord};
