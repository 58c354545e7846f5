pub mod coastal_guide;
pub mod collection;
pub mod manual_guide;
pub mod portal;
pub mod report;

pub use coastal_guide::coastal_guide_page;
pub use collection::collection_page;
pub use manual_guide::{family_worksheet, manual_guide_page};
pub use portal::portal_page;
pub use report::{render_report, report_subject};
