use std::net::{IpAddr, SocketAddr};

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::reader::UdpReader;

/// UDP datagram with its endpoints, borrowing the payload from the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    pub source: SocketAddr,
    pub destination: SocketAddr,
    pub payload: &'a [u8],
}

/// Extract a UDP datagram from an Ethernet or raw IP frame.
///
/// Returns `Ok(None)` for other link types and non-UDP traffic.
pub fn parse_udp_datagram(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<UdpDatagram<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(data).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW => SlicedPacket::from_ip(data).map_err(|e| UdpError::Slice(e.to_string()))?,
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    let Some(TransportSlice::Udp(udp)) = sliced.transport else {
        return Ok(None);
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            IpAddr::V4(ipv4.header().source_addr()),
            IpAddr::V4(ipv4.header().destination_addr()),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            IpAddr::V6(ipv6.header().source_addr()),
            IpAddr::V6(ipv6.header().destination_addr()),
        ),
    };

    let segment = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?;
    let payload = UdpReader::new(segment.payload).payload()?;

    Ok(Some(UdpDatagram {
        source: SocketAddr::new(src_ip, udp.source_port()),
        destination: SocketAddr::new(dst_ip, udp.destination_port()),
        payload,
    }))
}
