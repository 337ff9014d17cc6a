pub mod document;
pub mod league;
