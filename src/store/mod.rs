mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgPortfolioStore;
