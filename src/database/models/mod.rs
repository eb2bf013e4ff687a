pub mod auto;
pub mod marke;

pub use auto::{Auto, AutoRow};
pub use marke::Marke;
