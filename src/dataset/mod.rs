// Video metadata table — record types and the validating loader.

pub mod models;
pub mod table;

pub use models::VideoRecord;
