pub mod pool;
pub mod update;
