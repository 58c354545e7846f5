pub mod changes;
pub mod condition;
pub mod filter;
pub mod listing;
