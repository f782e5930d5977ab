mod form;
mod reconcile;
mod sink;
mod store;
mod submitter;
mod value_object;

pub use form::*;
pub use reconcile::*;
pub use sink::*;
pub use store::*;
pub use submitter::*;
pub use value_object::*;
