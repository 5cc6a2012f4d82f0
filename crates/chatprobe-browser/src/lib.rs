mod dom;
mod error;
mod session;

pub use error::{Error, Result};
pub use session::{ProbeSession, SessionOptions};
