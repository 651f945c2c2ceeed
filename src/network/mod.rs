pub mod codec;
pub mod network;

pub use network::Network;
