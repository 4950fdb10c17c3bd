pub mod cell;
pub mod entity;
pub mod grid;
