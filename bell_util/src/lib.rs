pub mod iso8601;
mod macros;

pub use macros::join_values;
