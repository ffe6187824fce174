pub mod insights;
pub mod pipeline;
pub mod pool;
pub mod ranker;
pub mod scoring;
pub mod skills;
pub mod weights;
