pub mod event;
pub mod registration;
pub mod team;

pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use team::TeamRepository;
