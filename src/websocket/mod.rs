pub mod channel;
pub mod connection;
pub mod handler;
pub mod types;

pub use channel::{ChannelError, RealtimeChannel};
pub use connection::ConnectionManager;
pub use handler::ws_handler;
pub use types::{ChannelAddress, ServerEvent};
