pub mod professional;
pub mod recommendation;
