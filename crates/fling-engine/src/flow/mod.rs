pub mod machine;
pub mod progress;

pub use machine::GameFlow;
pub use progress::{GameProgress, Phase};
