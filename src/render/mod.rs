pub mod content;
pub mod images;
pub mod meta;
pub mod profile;
pub mod schema;
