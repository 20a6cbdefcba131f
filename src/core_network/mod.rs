pub mod data_channel;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;

pub use data_channel::DataChannel;
pub use error::DataChannelError;
