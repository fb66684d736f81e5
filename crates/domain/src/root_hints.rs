//! IANA root server hints (https://www.iana.org/domains/root/servers).
//!
//! Compiled in and never fetched. Every walk starts from a uniformly chosen entry.

use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootServer {
    pub name: &'static str,
    pub addr: Ipv4Addr,
}

pub static ROOT_SERVERS: [RootServer; 13] = [
    RootServer { name: "a.root-servers.net", addr: Ipv4Addr::new(198, 41, 0, 4) },
    RootServer { name: "b.root-servers.net", addr: Ipv4Addr::new(170, 247, 170, 2) },
    RootServer { name: "c.root-servers.net", addr: Ipv4Addr::new(192, 33, 4, 12) },
    RootServer { name: "d.root-servers.net", addr: Ipv4Addr::new(199, 7, 91, 13) },
    RootServer { name: "e.root-servers.net", addr: Ipv4Addr::new(192, 203, 230, 10) },
    RootServer { name: "f.root-servers.net", addr: Ipv4Addr::new(192, 5, 5, 241) },
    RootServer { name: "g.root-servers.net", addr: Ipv4Addr::new(192, 112, 36, 4) },
    RootServer { name: "h.root-servers.net", addr: Ipv4Addr::new(198, 97, 190, 53) },
    RootServer { name: "i.root-servers.net", addr: Ipv4Addr::new(192, 36, 148, 17) },
    RootServer { name: "j.root-servers.net", addr: Ipv4Addr::new(192, 58, 128, 30) },
    RootServer { name: "k.root-servers.net", addr: Ipv4Addr::new(193, 0, 14, 129) },
    RootServer { name: "l.root-servers.net", addr: Ipv4Addr::new(199, 7, 83, 42) },
    RootServer { name: "m.root-servers.net", addr: Ipv4Addr::new(202, 12, 27, 33) },
];

pub fn all() -> &'static [RootServer] {
    &ROOT_SERVERS
}
