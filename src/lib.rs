//! Library exports for deckconf.
//!
//! Recording input into replayable scripts, compiling them, and managing the
//! action files a Stream Deck style daemon reads. The `deckconf` binary is a
//! thin CLI over these modules.

pub mod config;
pub mod daemon;
pub mod input;
pub mod layout;
pub mod recorder;
pub mod script;
pub mod util;

pub use config::Config;
