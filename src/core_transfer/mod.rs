// Byte streaming between storage and data connections

pub mod ascii;
pub mod error;
pub mod modes;
pub mod stream;

pub use error::TransferError;
pub use modes::TransferType;
pub use stream::{receive_file, send_file, send_listing};
