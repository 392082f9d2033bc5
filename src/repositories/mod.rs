pub mod events;
pub mod sessions;
pub mod tickets;
pub mod users;

pub use events::EventRepository;
pub use sessions::SessionRepository;
pub use tickets::TicketRepository;
pub use users::UserRepository;
