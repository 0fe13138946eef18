pub mod converter;
pub mod store;

pub use converter::Converter;
pub use store::{ConfigStore, JsonFileStore};
