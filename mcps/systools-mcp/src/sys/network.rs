//! Network interface and socket information

use netstat2::{get_sockets_info, AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, TcpState};
use sysinfo::{Networks, Pid, ProcessesToUpdate, System};

use crate::types::{NetworkInterfaceEntry, PortEntry, SysError, SysResult};

/// Enumerate network interfaces with addresses and traffic counters.
pub fn get_network_info() -> Vec<NetworkInterfaceEntry> {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<NetworkInterfaceEntry> = networks
        .iter()
        .map(|(name, data)| NetworkInterfaceEntry {
            name: name.clone(),
            mac_address: data.mac_address().to_string(),
            ip_addresses: data
                .ip_networks()
                .iter()
                .map(|ip| ip.addr.to_string())
                .collect(),
            bytes_sent: data.total_transmitted(),
            bytes_received: data.total_received(),
            packets_sent: data.total_packets_transmitted(),
            packets_received: data.total_packets_received(),
            errors_in: data.total_errors_on_received(),
            errors_out: data.total_errors_on_transmitted(),
        })
        .collect();

    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    interfaces
}

/// Enumerate TCP sockets in the LISTEN state, resolving owning processes
/// where the OS allows it.
pub fn get_listening_ports(sys: &mut System) -> SysResult<Vec<PortEntry>> {
    let families = AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6;
    let sockets = get_sockets_info(families, ProtocolFlags::TCP)
        .map_err(|e| SysError::Io(std::io::Error::other(e.to_string())))?;

    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut ports = Vec::new();
    for socket in sockets {
        let ProtocolSocketInfo::Tcp(tcp) = &socket.protocol_socket_info else {
            continue;
        };
        if tcp.state != TcpState::Listen {
            continue;
        }

        let pid = socket.associated_pids.first().copied();
        let process_name = pid
            .and_then(|p| sys.process(Pid::from_u32(p)))
            .map(|process| process.name().to_string_lossy().to_string());

        ports.push(PortEntry {
            port: tcp.local_port,
            protocol: "tcp".to_string(),
            status: tcp.state.to_string(),
            local_address: tcp.local_addr.to_string(),
            pid,
            process_name,
        });
    }

    ports.sort_by_key(|p| (p.port, p.local_address.clone()));
    Ok(ports)
}
