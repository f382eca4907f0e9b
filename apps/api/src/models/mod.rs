pub mod resume;
pub mod review;
