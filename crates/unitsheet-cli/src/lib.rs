//! Library side of the `unitsheet` command: job configuration, logging
//! setup and the staged run over one inventory sheet.

pub mod config;
pub mod logging;
pub mod pipeline;
