pub mod probe;
pub mod summary;
