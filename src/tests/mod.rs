mod db_tests;
mod export_tests;
mod template_tests;
pub mod utils;
