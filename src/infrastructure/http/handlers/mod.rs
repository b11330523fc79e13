//! HTTP Handlers

mod chapter;
mod maintenance;
mod novel;
mod part;
mod ping;
mod upload;

pub use chapter::*;
pub use maintenance::*;
pub use novel::*;
pub use part::*;
pub use ping::*;
pub use upload::*;
