pub mod check;
pub mod render;
pub mod schema;
pub mod variants;
