pub mod events;
pub mod participation;
pub mod payments;
pub mod registrations;
