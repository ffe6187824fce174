pub mod pool;
pub mod subjects;

pub use pool::{create_pool_from_url, PgPool};
pub use subjects::PgSubjectStore;
