pub use cmds::convert;
pub use cmds::pack;
pub mod config;
pub mod file_cache;
pub mod iolog;
pub mod trace_parser;

mod cmds;
mod error;
pub use error::{ConvError, ConvResult};
