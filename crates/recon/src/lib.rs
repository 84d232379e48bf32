//! `rollmatch-recon` - session-log to directory student reconciliation.
//!
//! Pure engine crate: receives pre-loaded rows, returns matched and review
//! lists. CSV loading and writing helpers live here too, but all file IO is
//! left to the caller.

pub mod config;
pub mod dates;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod export;
pub mod index;
pub mod load;
pub mod matcher;
pub mod model;
pub mod names;

pub use config::ReconConfig;
pub use engine::{load_input, run};
pub use error::ReconError;
pub use index::NameIndex;
pub use model::{MatchOutcome, ReconInput, ReconResult, ReviewItem, ReviewReason};
pub use names::NameKey;
