pub mod config;
pub mod logging;

pub mod candidate;
pub mod edition;
pub mod matching;
pub mod metadata;
pub mod probe;
pub mod report;
pub mod sweep;
pub mod transport;
