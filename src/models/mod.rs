pub mod event;
pub mod session;
pub mod ticket;
pub mod user;

pub use event::{Event, NewEvent};
pub use session::Session;
pub use ticket::{Ticket, TicketStatus, TicketTypeDraft};
pub use user::{User, UserRole};
