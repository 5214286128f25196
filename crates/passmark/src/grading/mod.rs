pub mod import;
pub mod subjects;
