pub mod sections;
pub mod split;
