//! UI Components
//!
//! Sections of the registry page and the small widgets they share.

mod add_gift_form;
mod admin_toggle;
mod contact_section;
mod delete_confirm_button;
mod gift_card;
mod gift_list;
mod hero_section;
mod info_editor;
mod modal;
mod toast;

pub use add_gift_form::AddGiftForm;
pub use admin_toggle::AdminToggle;
pub use contact_section::ContactSection;
pub use delete_confirm_button::DeleteConfirmButton;
pub use gift_card::GiftCard;
pub use gift_list::GiftList;
pub use hero_section::HeroSection;
pub use info_editor::InfoEditor;
pub use modal::Modal;
pub use toast::ToastHost;
