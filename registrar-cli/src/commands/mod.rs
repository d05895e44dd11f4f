pub mod demo;
pub mod render;
pub mod session;
pub mod shell;
