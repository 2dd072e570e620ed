pub const CCNAME_ENVVAR: &str = "KRB5CCNAME";
pub const CCNEW_ENVVAR: &str = "KRB5CCNEW";

pub fn get_krb5ccname_env() -> Option<String> {
    std::env::var(CCNAME_ENVVAR).ok().filter(|v| !v.is_empty())
}

/// Name of the cache a process uses when nothing else is configured:
/// `KRB5CCNAME`, or the per-user file in `/tmp`.
pub fn default_cache_name() -> String {
    get_krb5ccname_env().unwrap_or_else(per_user_cache_name)
}

#[cfg(unix)]
fn per_user_cache_name() -> String {
    let uid = unsafe { libc::getuid() };
    format!("FILE:/tmp/krb5cc_{}", uid)
}

#[cfg(not(unix))]
fn per_user_cache_name() -> String {
    format!("FILE:{}", std::env::temp_dir().join("krb5cc").display())
}
