use std::fmt;

pub const CCACHE_V3: u16 = 0x0503;
pub const CCACHE_V4: u16 = 0x0504;

/// Whole contents of a ccache file: header plus every stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcacheFile {
    pub version: u16,
    pub default_principal: Principal,
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub name_type: u32,
    pub realm: String,
    pub components: Vec<String>,
}

impl Principal {
    pub fn new(name_type: u32, realm: &str, components: &[&str]) -> Self {
        Self {
            name_type,
            realm: realm.to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            write!(f, "@{}", self.realm)
        } else {
            write!(f, "{}@{}", self.components.join("/"), self.realm)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub addr_type: u16,
    pub addr_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthData {
    pub ad_type: u16,
    pub ad_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyblock {
    pub keytype: u16,
    pub keyvalue: Vec<u8>,
}

/// Validity window of a ticket, seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketTimes {
    pub auth_time: u32,
    pub start_time: u32,
    pub end_time: u32,
    pub renew_till: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub client: Principal,
    pub server: Principal,
    pub key: Keyblock,
    pub times: TicketTimes,
    pub is_skey: u8,
    pub ticket_flags: u32,
    pub addresses: Vec<Address>,
    pub authdata: Vec<AuthData>,
    pub ticket: Vec<u8>,
    pub second_ticket: Vec<u8>,
}

impl Credential {
    pub fn is_tgt(&self) -> bool {
        self.server
            .components
            .first()
            .map_or(false, |s| s.starts_with("krbtgt"))
    }
}
