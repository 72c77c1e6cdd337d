//! Host identity
//!
//! Finds the hardware address of the interface that carries the default
//! outbound route.

use std::net::{IpAddr, UdpSocket};

use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};

use crate::error::{Result, StoreError};

/// Well-known external address used to pick the outbound route.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
const ROUTE_PROBE_ADDR: &str = "1.1.1.1:80";

/// Local IP address the host would use to reach the outside world
pub fn outbound_ip() -> Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .map_err(|e| StoreError::IdentityUnavailable(format!("no outbound route: {}", e)))?;
    socket
        .connect(ROUTE_PROBE_ADDR)
        .map_err(|e| StoreError::IdentityUnavailable(format!("no outbound route: {}", e)))?;

    let local = socket
        .local_addr()
        .map_err(|e| StoreError::IdentityUnavailable(format!("no outbound route: {}", e)))?;
    Ok(local.ip())
}

/// Hardware (MAC) address of the interface that owns `ip`, lowercase
pub fn hardware_address(ip: IpAddr) -> Result<String> {
    let interfaces = NetworkInterface::show()
        .map_err(|e| StoreError::IdentityUnavailable(format!("cannot list interfaces: {}", e)))?;

    let iface = interfaces
        .iter()
        .find(|iface| iface.addr.iter().any(|addr| addr_ip(addr) == ip))
        .ok_or_else(|| StoreError::IdentityUnavailable(format!("no interface owns {}", ip)))?;

    usable_mac(&iface.name, iface.mac_addr.as_deref())
}

/// Identity string of this host: the outbound interface's MAC address
pub fn host_identity() -> Result<String> {
    let ip = outbound_ip()?;
    let mac = hardware_address(ip)?;
    tracing::debug!(%ip, "resolved outbound interface");
    Ok(mac)
}

/// Lowercased MAC, or an error if it is missing or all zeros
///
/// Tunnel and VPN interfaces often report `00:00:00:00:00:00`, which would
/// give every such host the same key.
fn usable_mac(iface: &str, mac: Option<&str>) -> Result<String> {
    match mac {
        Some(mac) if mac.chars().any(|c| c.is_ascii_hexdigit() && c != '0') => {
            Ok(mac.to_ascii_lowercase())
        }
        _ => Err(StoreError::IdentityUnavailable(format!(
            "interface {} has no usable hardware address",
            iface
        ))),
    }
}

fn addr_ip(addr: &Addr) -> IpAddr {
    match addr {
        Addr::V4(v4) => IpAddr::V4(v4.ip),
        Addr::V6(v6) => IpAddr::V6(v6.ip),
    }
}
