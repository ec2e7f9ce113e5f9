pub mod lock_reuse;
pub mod signals;

pub use lock_reuse::LockReuseClassifier;
