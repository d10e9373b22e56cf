pub mod explain;
pub mod helpers;
pub mod project;
pub mod usage;
