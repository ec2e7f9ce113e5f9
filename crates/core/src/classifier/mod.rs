pub mod traits;
pub mod types;

pub use traits::Classifier;
pub use types::{Assessment, CandidateCallSite};
