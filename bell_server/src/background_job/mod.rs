mod update;

pub use update::*;
