use crate::kerberos::ccache::types::*;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

pub fn write_ccache_bytes(ccache: &CcacheFile) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();

    write_header(&mut buf, ccache.version, &ccache.default_principal)?;

    for cred in &ccache.credentials {
        write_credential(&mut buf, cred)?;
    }

    Ok(buf)
}

/// Writes the file header. v4 files get an empty tag block; v3 has none.
pub fn write_header<W: Write>(buf: &mut W, version: u16, principal: &Principal) -> io::Result<()> {
    buf.write_u16::<BigEndian>(version)?;

    if version == CCACHE_V4 {
        buf.write_u16::<BigEndian>(0)?;
    }

    write_principal(buf, principal)
}

fn write_principal<W: Write>(buf: &mut W, principal: &Principal) -> io::Result<()> {
    buf.write_u32::<BigEndian>(principal.name_type)?;
    buf.write_u32::<BigEndian>(principal.components.len() as u32)?;

    write_counted_string(buf, &principal.realm)?;

    for component in &principal.components {
        write_counted_string(buf, component)?;
    }

    Ok(())
}

pub fn write_credential<W: Write>(buf: &mut W, cred: &Credential) -> io::Result<()> {
    write_principal(buf, &cred.client)?;
    write_principal(buf, &cred.server)?;
    write_keyblock(buf, &cred.key)?;

    buf.write_u32::<BigEndian>(cred.times.auth_time)?;
    buf.write_u32::<BigEndian>(cred.times.start_time)?;
    buf.write_u32::<BigEndian>(cred.times.end_time)?;
    buf.write_u32::<BigEndian>(cred.times.renew_till)?;

    buf.write_u8(cred.is_skey)?;
    buf.write_u32::<BigEndian>(cred.ticket_flags)?;

    // Addresses
    buf.write_u32::<BigEndian>(cred.addresses.len() as u32)?;
    for addr in &cred.addresses {
        buf.write_u16::<BigEndian>(addr.addr_type)?;
        write_counted_data(buf, &addr.addr_data)?;
    }

    // Authdata
    buf.write_u32::<BigEndian>(cred.authdata.len() as u32)?;
    for ad in &cred.authdata {
        buf.write_u16::<BigEndian>(ad.ad_type)?;
        write_counted_data(buf, &ad.ad_data)?;
    }

    write_counted_data(buf, &cred.ticket)?;
    write_counted_data(buf, &cred.second_ticket)?;

    Ok(())
}

fn write_keyblock<W: Write>(buf: &mut W, key: &Keyblock) -> io::Result<()> {
    buf.write_u16::<BigEndian>(key.keytype)?;
    write_counted_data(buf, &key.keyvalue)
}

fn write_counted_string<W: Write>(buf: &mut W, s: &str) -> io::Result<()> {
    write_counted_data(buf, s.as_bytes())
}

fn write_counted_data<W: Write>(buf: &mut W, data: &[u8]) -> io::Result<()> {
    buf.write_u32::<BigEndian>(data.len() as u32)?;
    buf.write_all(data)
}
