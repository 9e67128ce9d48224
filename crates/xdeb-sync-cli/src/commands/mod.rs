pub mod providers;
pub mod sync;
