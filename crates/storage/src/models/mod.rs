pub mod event;
pub mod registration;
pub mod team;
pub mod team_member;

pub use event::Event;
pub use registration::Registration;
pub use team::Team;
pub use team_member::TeamMember;
