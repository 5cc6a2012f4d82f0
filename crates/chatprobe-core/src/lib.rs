pub mod cascade;
pub mod catalog;
pub mod error;
pub mod report;

pub use cascade::{Cascade, Hit, Strategy, in_bottom_right};
pub use error::{Error, Result};
pub use report::{ConsoleEntry, ProbeReport};
