pub mod components;
pub mod layouts;
pub mod pages;

pub use components::format_eur;
