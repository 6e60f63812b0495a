pub mod cover_letter;
pub mod document;
pub mod resume;
