pub mod host;
pub mod pipeline;
