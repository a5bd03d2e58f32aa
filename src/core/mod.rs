pub mod draft;
pub mod section;
