pub mod coordinator;
pub mod render;
pub mod trajectory;
