//! PDF export: payloads are parked under short-lived tokens so the client's
//! preview page can fetch them while an external renderer prints that page.

pub mod handlers;
pub mod renderer;
pub mod token_store;
