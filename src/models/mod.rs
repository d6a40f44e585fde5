pub mod issue;
pub mod record_set;

pub use issue::*;
pub use record_set::*;
