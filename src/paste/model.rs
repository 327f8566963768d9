pub use crate::models::{CreatePaste, CreatedPaste, RetrievedPaste};
