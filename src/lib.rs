// Public library interface for stakemap
// The CLI and the debug-layout tool are thin wrappers over these modules

pub mod error;
pub mod layout;
pub mod render;
pub mod store;

pub use error::{LayoutError, TableError};
pub use layout::{compute_layout, FlatLayout, LayoutConfig, Rect};
pub use store::OwnershipStore;
