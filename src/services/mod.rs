pub mod catalog;
pub mod checkout;
pub mod conversation;
pub mod freeform;
pub mod pricing;
pub mod timeslots;
