//! Persistent medium for celldb
//!
//! The medium is an opaque key -> blob store. Everything typed lives above
//! it: stores encode through a codec and hand the medium finished bytes.

mod backend;
mod defaults;
mod errors;
mod local;

pub use backend::Medium;
pub use defaults::{DefaultSource, NoDefaults, StaticDefaults};
pub use errors::{MediumError, MediumResult};
pub use local::LocalMedium;
