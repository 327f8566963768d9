mod kgs_keys;
mod pastes;

pub use kgs_keys::PostgresKgsRepo;
pub use pastes::PostgresPasteRepo;
