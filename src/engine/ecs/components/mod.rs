pub mod general;
pub mod network;
pub mod physics;
pub mod player;
