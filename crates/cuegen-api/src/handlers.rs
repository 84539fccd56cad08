//! Request handlers.

pub mod chapters;
pub mod context;
pub mod health;
pub mod metadata;
pub mod transcribe;

pub use chapters::*;
pub use context::*;
pub use health::*;
pub use metadata::*;
pub use transcribe::*;
