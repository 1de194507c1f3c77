pub mod debug;
pub mod hierarchy;
pub mod input;
pub mod objects;
