//! Library side of the `player-xref` command-line tool.

pub mod logging;
pub mod pipeline;
pub mod types;
