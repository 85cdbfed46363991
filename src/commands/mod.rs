//! CLI commands implementation

pub mod init;
pub mod reorg;
pub mod replace;
pub mod status;

pub use init::*;
pub use reorg::*;
pub use replace::*;
pub use status::*;
