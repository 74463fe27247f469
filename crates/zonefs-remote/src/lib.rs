pub mod backends;
pub mod deadline;
pub mod router;
pub mod session;

pub use backends::{FsStore, MemoryStore};
pub use deadline::DeadlineStore;
pub use router::{Mount, ZoneRouter};
pub use session::{Session, SessionError};
