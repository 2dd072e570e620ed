//! In-memory credential store that journals every call, for driving the
//! transfer logic through failure paths the file backend cannot reach.

use crate::error::{Error, Result};
use crate::kerberos::ccache::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::ops::Deref;
use std::rc::Rc;

pub fn credential(client: &str, server: &str) -> Credential {
    Credential {
        client: Principal::new(1, "EXAMPLE.COM", &[client]),
        server: Principal::new(2, "EXAMPLE.COM", &[server, "EXAMPLE.COM"]),
        key: Keyblock {
            keytype: 18,
            keyvalue: vec![9; 32],
        },
        times: TicketTimes::default(),
        is_skey: 0,
        ticket_flags: 0,
        addresses: vec![],
        authdata: vec![],
        ticket: format!("{}:{}", client, server).into_bytes(),
        second_ticket: vec![],
    }
}

#[derive(Debug, Default)]
struct Store {
    principal: Option<Principal>,
    records: Vec<Credential>,
}

#[derive(Debug, Default)]
struct Shared {
    stores: HashMap<String, Store>,
    journal: Vec<String>,
    unique: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    fail_store_after: Option<usize>,
    fail_read_at: Option<usize>,
    fail_initialize: bool,
    fail_close: bool,
}

/// Read side of the mock, still usable after the context has been handed
/// to (and freed by) a session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    shared: Rc<RefCell<Shared>>,
}

impl Ledger {
    /// Creates `name` holding `records`, with the first record's client as
    /// default principal.
    pub fn seed(&self, name: &str, records: &[Credential]) {
        let mut shared = self.shared.borrow_mut();
        let store = shared.stores.entry(name.to_string()).or_default();
        store.principal = records.first().map(|r| r.client.clone());
        store.records = records.to_vec();
    }

    pub fn occupy(&self, name: &str, principal: Principal) {
        let mut shared = self.shared.borrow_mut();
        shared.stores.entry(name.to_string()).or_default().principal = Some(principal);
    }

    pub fn records(&self, name: &str) -> Vec<Credential> {
        self.shared
            .borrow()
            .stores
            .get(name)
            .map(|s| s.records.clone())
            .unwrap_or_default()
    }

    pub fn principal(&self, name: &str) -> Option<Principal> {
        self.shared
            .borrow()
            .stores
            .get(name)
            .and_then(|s| s.principal.clone())
    }

    pub fn journal(&self) -> Vec<String> {
        self.shared.borrow().journal.clone()
    }

    pub fn journal_count(&self, entry: &str) -> usize {
        self.shared
            .borrow()
            .journal
            .iter()
            .filter(|e| e.as_str() == entry)
            .count()
    }

    pub fn touched(&self, op: &str) -> bool {
        self.shared
            .borrow()
            .journal
            .iter()
            .any(|e| e.split(' ').next() == Some(op))
    }

    fn record(&self, entry: String) {
        self.shared.borrow_mut().journal.push(entry);
    }
}

#[derive(Debug)]
pub struct MockContext {
    default_name: String,
    ledger: Ledger,
    pub fail_store_after: Option<usize>,
    pub fail_read_at: Option<usize>,
    pub fail_initialize: bool,
    pub fail_close: bool,
}

impl MockContext {
    pub fn new() -> Self {
        Self {
            default_name: "FILE:/default".to_string(),
            ledger: Ledger::default(),
            fail_store_after: None,
            fail_read_at: None,
            fail_initialize: false,
            fail_close: false,
        }
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger.clone()
    }

    fn faults(&self) -> Faults {
        Faults {
            fail_store_after: self.fail_store_after,
            fail_read_at: self.fail_read_at,
            fail_initialize: self.fail_initialize,
            fail_close: self.fail_close,
        }
    }

    fn cache(&self, name: String, cache_type: CacheType) -> MockCache {
        MockCache {
            name,
            cache_type,
            ledger: self.ledger.clone(),
            faults: self.faults(),
        }
    }
}

impl Deref for MockContext {
    type Target = Ledger;

    fn deref(&self) -> &Ledger {
        &self.ledger
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        self.ledger.record("free".to_string());
    }
}

impl Context for MockContext {
    type Cache = MockCache;

    fn default_name(&self) -> String {
        self.default_name.clone()
    }

    fn set_default_name(&mut self, name: &str) {
        self.ledger.record(format!("set_default {}", name));
        self.default_name = name.to_string();
    }

    fn resolve(&self, name: &str) -> Result<MockCache> {
        self.ledger.record(format!("resolve {}", name));
        let reference = parse_cache_name(name)?;
        if reference.cache_type == "BAD" {
            return Err(Error::UnsupportedType {
                name: name.to_string(),
                cache_type: "BAD".to_string(),
            });
        }
        Ok(self.cache(name.to_string(), reference.cache_type))
    }

    fn new_unique(&self, cache_type: &CacheType) -> Result<MockCache> {
        self.ledger.record(format!("new_unique {}", cache_type));
        let reference = parse_cache_name(&self.default_name)?;
        let n = {
            let mut shared = self.ledger.shared.borrow_mut();
            shared.unique += 1;
            shared.unique
        };
        let name = format!("{}::{}/tkt{}", cache_type, reference.residual, n);
        self.ledger
            .shared
            .borrow_mut()
            .stores
            .insert(name.clone(), Store::default());
        Ok(self.cache(name, cache_type.clone()))
    }
}

#[derive(Debug)]
pub struct MockCache {
    name: String,
    cache_type: CacheType,
    ledger: Ledger,
    faults: Faults,
}

fn injected(what: &str) -> Error {
    Error::io(what, io::Error::new(io::ErrorKind::Other, "injected failure"))
}

impl CredentialCache for MockCache {
    type Cursor = usize;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn cache_type(&self) -> &CacheType {
        &self.cache_type
    }

    fn principal(&self) -> Result<Option<Principal>> {
        Ok(self.ledger.principal(&self.name))
    }

    fn initialize(&mut self, principal: &Principal) -> Result<()> {
        self.ledger.record(format!("initialize {}", self.name));
        if self.faults.fail_initialize {
            return Err(injected(&self.name));
        }
        let mut shared = self.ledger.shared.borrow_mut();
        shared.stores.entry(self.name.clone()).or_default().principal = Some(principal.clone());
        Ok(())
    }

    fn store(&mut self, cred: &Credential) -> Result<()> {
        self.ledger.record(format!("store {}", self.name));
        let mut shared = self.ledger.shared.borrow_mut();
        let store = shared.stores.entry(self.name.clone()).or_default();
        if store.principal.is_none() {
            return Err(Error::NotInitialized(self.name.clone()));
        }
        if self.faults.fail_store_after == Some(store.records.len()) {
            return Err(injected(&self.name));
        }
        store.records.push(cred.clone());
        Ok(())
    }

    fn start_seq(&self) -> Result<usize> {
        self.ledger.record(format!("start_seq {}", self.name));
        Ok(0)
    }

    fn next_cred(&self, cursor: &mut usize) -> Result<Option<Credential>> {
        if self.faults.fail_read_at == Some(*cursor) {
            return Err(injected(&self.name));
        }
        let next = self.ledger.records(&self.name).get(*cursor).cloned();
        *cursor += 1;
        Ok(next)
    }

    fn end_seq(&self, _cursor: usize) -> Result<()> {
        self.ledger.record(format!("end_seq {}", self.name));
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.ledger.record(format!("close {}", self.name));
        if self.faults.fail_close {
            return Err(injected(&self.name));
        }
        Ok(())
    }
}
