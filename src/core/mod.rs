pub mod context;
pub mod errors;
pub mod services;
pub mod time;
pub mod utils;

pub use context::RequestContext;
pub use errors::{CliError, DairyError};
pub use time::{Clock, FixedClock, SystemClock};
