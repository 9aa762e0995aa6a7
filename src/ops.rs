pub mod append;
pub mod prepend;
pub mod switch_to_latest;

pub use append::Append;
pub use prepend::Prepend;
pub use switch_to_latest::SwitchToLatest;
