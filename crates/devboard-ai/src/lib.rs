pub mod client;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod parse;

pub use client::*;
pub use context::*;
pub use dispatch::*;
pub use error::*;
pub use export::*;
pub use parse::*;
