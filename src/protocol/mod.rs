//! JSON command protocol: wire messages, dispatch and broadcast fan-out.

pub mod broadcaster;
pub mod dispatcher;
pub mod messages;

pub use broadcaster::{Broadcaster, Delivery};
pub use dispatcher::CommandDispatcher;
pub use messages::{Reply, Status, VarConfigEntry};
