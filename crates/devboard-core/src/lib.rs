pub mod actions;
pub mod persistence;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::*;
pub use reducer::*;
pub use state::*;
pub use store::*;

pub use persistence::*;
