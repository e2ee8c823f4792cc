pub mod lifecycle;
pub mod logging;
pub mod pipeline;
pub mod types;
