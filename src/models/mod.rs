pub mod catalog;
pub mod checkout;
pub mod conversation;
pub mod message;

pub use catalog::{Caregiver, Package, PriceTier, Qualification, ServiceType};
pub use checkout::{CheckoutPayload, CHECKOUT_ITEM_TYPE};
pub use conversation::{Conversation, Step, UserSelection};
pub use message::{InteractiveSelection, Message, QuickReply, Role};
