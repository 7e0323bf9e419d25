pub mod cli;
pub mod client;
pub mod feed;
pub mod harvest;
pub mod index;
pub mod reader;
pub mod server;
pub mod source;
pub mod util;
