mod kgs_keys;
mod pastes;

pub use kgs_keys::KgsRepo;
pub use pastes::PasteRepo;
