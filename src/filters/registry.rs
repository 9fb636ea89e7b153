//! Static IANA tables backing protocol and port lookups.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// IP protocol number and its keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub name: &'static str,
    pub number: u8,
}

/// Well-known transport port and its service name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub port: u16,
}

const PROTOCOL_TABLE: &[(&str, u8)] = &[
    ("HOPOPT", 0),
    ("ICMP", 1),
    ("IGMP", 2),
    ("GGP", 3),
    ("IPv4", 4),
    ("ST", 5),
    ("TCP", 6),
    ("CBT", 7),
    ("EGP", 8),
    ("IGP", 9),
    ("PUP", 12),
    ("UDP", 17),
    ("XNS-IDP", 22),
    ("RDP", 27),
    ("DCCP", 33),
    ("IPv6", 41),
    ("IPv6-Route", 43),
    ("IPv6-Frag", 44),
    ("RSVP", 46),
    ("GRE", 47),
    ("ESP", 50),
    ("AH", 51),
    ("IPv6-ICMP", 58),
    ("IPv6-NoNxt", 59),
    ("IPv6-Opts", 60),
    ("EIGRP", 88),
    ("OSPFIGP", 89),
    ("IPIP", 94),
    ("PIM", 103),
    ("VRRP", 112),
    ("L2TP", 115),
    ("SCTP", 132),
    ("UDPLite", 136),
    ("MPLS-in-IP", 137),
];

const SERVICE_TABLE: &[(&str, u16)] = &[
    ("ftp-data", 20),
    ("ftp", 21),
    ("ssh", 22),
    ("telnet", 23),
    ("smtp", 25),
    ("domain", 53),
    ("bootps", 67),
    ("bootpc", 68),
    ("tftp", 69),
    ("http", 80),
    ("kerberos", 88),
    ("pop3", 110),
    ("sunrpc", 111),
    ("ntp", 123),
    ("netbios-ns", 137),
    ("imap", 143),
    ("snmp", 161),
    ("ldap", 389),
    ("https", 443),
    ("syslog", 514),
    ("submission", 587),
    ("ldaps", 636),
    ("imaps", 993),
    ("pop3s", 995),
    ("ms-sql-s", 1433),
    ("mysql", 3306),
    ("postgresql", 5432),
    ("redis", 6379),
    ("http-alt", 8080),
];

lazy_static! {
    /// Protocols ordered by number
    pub static ref PROTOCOLS: Vec<Protocol> = PROTOCOL_TABLE
        .iter()
        .map(|&(name, number)| Protocol { name, number })
        .collect();

    /// Services ordered by port
    pub static ref SERVICES: Vec<Service> = SERVICE_TABLE
        .iter()
        .map(|&(name, port)| Service { name, port })
        .collect();

    static ref SERVICES_BY_PORT: HashMap<u16, Service> =
        SERVICES.iter().map(|service| (service.port, *service)).collect();
}

/// Find a protocol by case-insensitive keyword or by its number
pub fn find_protocol(name_or_number: &str) -> Option<Protocol> {
    PROTOCOLS.iter().copied().find(|proto| {
        proto.name.eq_ignore_ascii_case(name_or_number)
            || proto.number.to_string() == name_or_number
    })
}

/// Service registered on a port
pub fn service_by_port(port: u16) -> Option<Service> {
    SERVICES_BY_PORT.get(&port).copied()
}

/// Service by case-insensitive name
pub fn service_by_name(name: &str) -> Option<Service> {
    SERVICES
        .iter()
        .copied()
        .find(|service| service.name.eq_ignore_ascii_case(name))
}
