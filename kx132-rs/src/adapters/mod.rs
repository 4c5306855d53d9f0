pub mod mock;
pub mod ssh;
pub mod tcp;
