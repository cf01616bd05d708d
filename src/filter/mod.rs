pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod scope;
pub mod types;

pub use error::FilterError;
pub use filter::{field, Filter};
pub use scope::NoteQuery;
pub use types::*;
