pub mod split;

pub use split::{SplitResult, compute_split};
