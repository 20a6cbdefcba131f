use crate::core_network::data_channel::DataChannel;
use crate::core_transfer::TransferType;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Per-connection state, owned by the control loop and lent to every handler.
#[derive(Debug)]
pub struct Session {
    pub username: Option<String>, // Set by USER, kept until replaced
    pub is_authenticated: bool,   // Set by a successful PASS
    pub transfer_type: TransferType,
    pub data_channel: DataChannel,
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
}

impl Session {
    pub fn new(peer_addr: SocketAddr, local_addr: SocketAddr) -> Self {
        Self {
            username: None,
            is_authenticated: false,
            transfer_type: TransferType::default(),
            data_channel: DataChannel::default(),
            peer_addr,
            local_addr,
        }
    }

    /// The username stored by USER, if it is non-empty.
    pub fn login_name(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }

    /// IPv4 address of the interface the client reached us on.
    pub fn local_ipv4(&self) -> Ipv4Addr {
        match self.local_addr.ip() {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(ip) => ip.to_ipv4_mapped().unwrap_or(Ipv4Addr::LOCALHOST),
        }
    }
}
