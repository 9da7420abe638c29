pub mod fixture;
pub mod install;

pub use install::install;
