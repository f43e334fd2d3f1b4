pub mod animate;
pub mod points;
pub mod sweep;
