//! Value types shared by every grid component.

mod patch;
mod range;
mod schema;
mod selection;
mod value;

pub use patch::*;
pub use range::*;
pub use schema::*;
pub use selection::*;
pub use value::*;
