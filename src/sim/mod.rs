pub mod event;
pub mod rng;
pub mod turn;
pub mod world;
