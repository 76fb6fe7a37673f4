//! Topic-based publish/subscribe over TCP.
//!
//! A [`Broker`] accepts [`BusClient`] connections and routes each published
//! payload to every session whose topic filter matches. Delivery is
//! at-most-once: a session whose queue is full misses the message.

pub mod broker;
pub mod client;
pub mod error;
pub mod framing;
pub mod packet;
pub mod topic;
mod transport;

pub use broker::Broker;
pub use client::{BusClient, Message};
pub use error::ComError;
pub use packet::{Packet, PacketError};
pub use transport::Transport;
