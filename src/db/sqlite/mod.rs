mod kgs_keys;
mod pastes;

pub use kgs_keys::SqliteKgsRepo;
pub use pastes::SqlitePasteRepo;
