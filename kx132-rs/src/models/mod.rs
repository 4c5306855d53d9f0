pub mod capture;
pub mod errors;
pub mod events;
pub mod shutdown;
