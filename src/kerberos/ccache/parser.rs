use crate::kerberos::ccache::types::*;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};

// Counted fields larger than this are treated as corruption rather than allocated.
const MAX_COUNTED_LEN: u32 = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Unsupported version: 0x{0:04x}")]
    UnsupportedVersion(u16),
}

/// Version and default principal found at the start of a ccache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub default_principal: Principal,
}

pub fn parse_ccache_bytes(data: &[u8]) -> Result<CcacheFile, ParseError> {
    let mut cursor = Cursor::new(data);
    let header = read_header(&mut cursor)?;

    let mut credentials = Vec::new();
    while let Some(cred) = read_credential(&mut cursor)? {
        credentials.push(cred);
    }

    Ok(CcacheFile {
        version: header.version,
        default_principal: header.default_principal,
        credentials,
    })
}

/// Reads the version, the v4 tag block and the default principal, leaving
/// the reader positioned on the first credential.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, ParseError> {
    let version = reader.read_u16::<BigEndian>()?;

    match version {
        CCACHE_V4 => {
            let tag_len = reader.read_u16::<BigEndian>()?;
            if tag_len > 0 {
                let mut tags = vec![0u8; tag_len as usize];
                reader.read_exact(&mut tags)?;
            }
        }
        CCACHE_V3 => {}
        _ => return Err(ParseError::UnsupportedVersion(version)),
    }

    let default_principal = parse_principal(reader)?;

    Ok(Header {
        version,
        default_principal,
    })
}

/// Returns `Ok(None)` when the reader is exhausted exactly on a record
/// boundary. Running out of data inside a record is an error.
pub fn read_credential<R: Read>(reader: &mut R) -> Result<Option<Credential>, ParseError> {
    let mut first = [0u8; 1];
    loop {
        match reader.read(&mut first) {
            Ok(0) => return Ok(None),
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let mut rest = (&first[..]).chain(&mut *reader);
    parse_credential(&mut rest)
        .map(Some)
        .map_err(|e| match e {
            ParseError::Io(ref io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
                ParseError::InvalidFormat("truncated credential record".to_string())
            }
            other => other,
        })
}

fn parse_principal<R: Read>(reader: &mut R) -> Result<Principal, ParseError> {
    let name_type = reader.read_u32::<BigEndian>()?;
    let num_components = reader.read_u32::<BigEndian>()?;

    let realm = parse_counted_string(reader)?;

    let mut components = Vec::new();
    for _ in 0..num_components {
        components.push(parse_counted_string(reader)?);
    }

    Ok(Principal {
        name_type,
        realm,
        components,
    })
}

fn parse_credential<R: Read>(reader: &mut R) -> Result<Credential, ParseError> {
    let client = parse_principal(reader)?;
    let server = parse_principal(reader)?;
    let key = parse_keyblock(reader)?;

    let times = TicketTimes {
        auth_time: reader.read_u32::<BigEndian>()?,
        start_time: reader.read_u32::<BigEndian>()?,
        end_time: reader.read_u32::<BigEndian>()?,
        renew_till: reader.read_u32::<BigEndian>()?,
    };

    let is_skey = reader.read_u8()?;
    let ticket_flags = reader.read_u32::<BigEndian>()?;

    let num_addrs = reader.read_u32::<BigEndian>()?;
    let mut addresses = Vec::new();
    for _ in 0..num_addrs {
        let addr_type = reader.read_u16::<BigEndian>()?;
        let addr_data = parse_counted_data(reader)?;
        addresses.push(Address { addr_type, addr_data });
    }

    let num_authdata = reader.read_u32::<BigEndian>()?;
    let mut authdata = Vec::new();
    for _ in 0..num_authdata {
        let ad_type = reader.read_u16::<BigEndian>()?;
        let ad_data = parse_counted_data(reader)?;
        authdata.push(AuthData { ad_type, ad_data });
    }

    let ticket = parse_counted_data(reader)?;
    let second_ticket = parse_counted_data(reader)?;

    Ok(Credential {
        client,
        server,
        key,
        times,
        is_skey,
        ticket_flags,
        addresses,
        authdata,
        ticket,
        second_ticket,
    })
}

fn parse_keyblock<R: Read>(reader: &mut R) -> Result<Keyblock, ParseError> {
    let keytype = reader.read_u16::<BigEndian>()?;
    let keyvalue = parse_counted_data(reader)?;

    Ok(Keyblock { keytype, keyvalue })
}

fn parse_counted_string<R: Read>(reader: &mut R) -> Result<String, ParseError> {
    let data = parse_counted_data(reader)?;
    String::from_utf8(data).map_err(|e| ParseError::InvalidFormat(format!("Invalid UTF-8: {}", e)))
}

fn parse_counted_data<R: Read>(reader: &mut R) -> Result<Vec<u8>, ParseError> {
    let len = reader.read_u32::<BigEndian>()?;
    if len > MAX_COUNTED_LEN {
        return Err(ParseError::InvalidFormat(format!(
            "counted field of {} bytes",
            len
        )));
    }
    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kerberos::ccache::writer::{write_ccache_bytes, write_credential};

    fn sample_credential() -> Credential {
        Credential {
            client: Principal::new(1, "EXAMPLE.COM", &["alice"]),
            server: Principal::new(2, "EXAMPLE.COM", &["krbtgt", "EXAMPLE.COM"]),
            key: Keyblock {
                keytype: 18,
                keyvalue: vec![7; 32],
            },
            times: TicketTimes {
                auth_time: 1_700_000_000,
                start_time: 1_700_000_000,
                end_time: 1_700_036_000,
                renew_till: 1_700_604_800,
            },
            is_skey: 0,
            ticket_flags: 0x50e1_0000,
            addresses: vec![],
            authdata: vec![],
            ticket: vec![0x61, 0x82, 0x01, 0x00],
            second_ticket: vec![],
        }
    }

    #[test]
    fn test_parse_v4_with_tags() {
        let mut data = vec![0x05, 0x04, 0x00, 0x0c];
        // One 12-byte tag: kdc time offset.
        data.extend_from_slice(&[0, 1, 0, 8, 0, 0, 0, 5, 0, 0, 0, 0]);
        // Principal: type 1, one component, realm "R", name "u".
        data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, b'R', 0, 0, 0, 1, b'u']);

        let ccache = parse_ccache_bytes(&data).unwrap();
        assert_eq!(ccache.version, CCACHE_V4);
        assert_eq!(ccache.default_principal.to_string(), "u@R");
        assert!(ccache.credentials.is_empty());
    }

    #[test]
    fn test_unsupported_version() {
        let err = parse_ccache_bytes(&[0x05, 0x02, 0, 0]).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(0x0502)));
    }

    #[test]
    fn test_read_credential_stops_on_boundary() {
        let cred = sample_credential();
        let mut buf = Vec::new();
        write_credential(&mut buf, &cred).unwrap();

        let mut cursor = Cursor::new(buf.as_slice());
        assert_eq!(read_credential(&mut cursor).unwrap(), Some(cred));
        assert_eq!(read_credential(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_truncated_credential_is_an_error() {
        let ccache = CcacheFile {
            version: CCACHE_V4,
            default_principal: Principal::new(1, "EXAMPLE.COM", &["alice"]),
            credentials: vec![sample_credential()],
        };
        let mut bytes = write_ccache_bytes(&ccache).unwrap();
        bytes.truncate(bytes.len() - 3);

        let err = parse_ccache_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_oversized_counted_field_rejected() {
        let mut data = vec![0x05, 0x03];
        data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);

        let err = parse_ccache_bytes(&data).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }
}
