mod observers;

pub use observers::{CoordinatorEvent, CoordinatorObserver};
