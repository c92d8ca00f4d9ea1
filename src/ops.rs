mod filter;

pub use filter::{FilterObserver, FilterOp};
