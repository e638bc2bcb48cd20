pub mod enums;
pub mod profile;
pub mod recommendation;

pub use enums::*;
pub use profile::*;
pub use recommendation::*;
