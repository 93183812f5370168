//! Background jobs - the recurring daily notification scan.

pub mod scheduler;

pub use scheduler::NotifyScheduler;
