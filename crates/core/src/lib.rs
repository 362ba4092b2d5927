//! Card draw and completion tracking. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod catalog;
pub mod completion;
pub mod draw;
pub mod events;
pub mod memory;
pub mod profile;
pub mod rng;
pub mod session;
pub mod store;

pub use cards::*;
pub use catalog::*;
pub use completion::*;
pub use draw::*;
pub use events::*;
pub use memory::*;
pub use profile::*;
pub use rng::*;
pub use session::*;
pub use store::*;
