use crate::error::{ConfigError, Result};
use crate::host::{HostCollection, HostRecord};
use crate::parser::parse;
use crate::serializer::{self, ExportFormat, stringify};
use crate::store::Store;
use crate::validate::{check_name, check_value};

pub const HOST_NAME: &str = "HostName";
pub const USER: &str = "User";
pub const PORT: &str = "Port";
pub const IDENTITY_FILE: &str = "IdentityFile";

/// The fields `add` and `edit` know how to set. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFields {
    pub host_name: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity_file: Option<String>,
}

impl HostFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.host_name.is_none()
            && self.user.is_none()
            && self.port.is_none()
            && self.identity_file.is_none()
    }

    /// Every supplied value has to fit on one config line as-is.
    pub fn check(&self) -> Result<()> {
        let text_fields = [
            (HOST_NAME, &self.host_name),
            (USER, &self.user),
            (IDENTITY_FILE, &self.identity_file),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                check_value(key, value).map_err(ConfigError::Invalid)?;
            }
        }
        Ok(())
    }

    fn apply(&self, host: &mut HostRecord) {
        if let Some(ref host_name) = self.host_name {
            host.set(HOST_NAME, host_name.as_str());
        }
        if let Some(ref user) = self.user {
            host.set(USER, user.as_str());
        }
        if let Some(port) = self.port {
            host.set(PORT, port.to_string());
        }
        if let Some(ref identity_file) = self.identity_file {
            host.set(IDENTITY_FILE, identity_file.as_str());
        }
    }
}

/// Read-modify-write operations over the hosts of one store.
///
/// Nothing is cached: every call parses the store afresh and every mutation
/// writes the whole file back. A failed call leaves the store untouched.
#[derive(Debug)]
pub struct Editor<S> {
    store: S,
}

impl<S: Store> Editor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All hosts currently in the store; an absent file has none.
    pub fn hosts(&self) -> Result<HostCollection> {
        Ok(self
            .store
            .load()?
            .map(|text| parse(&text))
            .unwrap_or_default())
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.hosts()?.names())
    }

    pub fn get(&self, name: &str) -> Result<Option<HostRecord>> {
        Ok(self.hosts()?.into_iter().find(|h| h.name == name))
    }

    pub fn add(&self, name: &str, fields: &HostFields) -> Result<HostRecord> {
        check_name(name).map_err(ConfigError::Invalid)?;
        fields.check()?;

        let mut hosts = self.hosts()?;
        if hosts.contains(name) {
            return Err(ConfigError::Duplicate(name.to_string()));
        }

        let mut host = HostRecord::new(name);
        fields.apply(&mut host);
        hosts.push(host.clone());

        self.persist(&hosts)?;
        Ok(host)
    }

    pub fn edit(&self, name: &str, fields: &HostFields) -> Result<HostRecord> {
        fields.check()?;

        let mut hosts = self.hosts()?;
        let host = hosts
            .get_mut(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;
        fields.apply(host);
        let updated = host.clone();

        self.persist(&hosts)?;
        Ok(updated)
    }

    pub fn remove(&self, name: &str) -> Result<HostRecord> {
        let mut hosts = self.hosts()?;
        let removed = hosts
            .remove(name)
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))?;

        self.persist(&hosts)?;
        Ok(removed)
    }

    /// Append a copy of `from` named `to`.
    pub fn copy(&self, from: &str, to: &str) -> Result<HostRecord> {
        check_name(to).map_err(ConfigError::Invalid)?;

        let mut hosts = self.hosts()?;
        let source = hosts
            .get(from)
            .ok_or_else(|| ConfigError::NotFound(from.to_string()))?;
        if hosts.contains(to) {
            return Err(ConfigError::Duplicate(to.to_string()));
        }

        let host = source.renamed(to);
        hosts.push(host.clone());

        self.persist(&hosts)?;
        Ok(host)
    }

    /// Replace every host with the ones in a structured dump.
    pub fn import(&self, text: &str) -> Result<HostCollection> {
        let hosts = serializer::import(text)?;
        self.persist(&hosts)?;
        Ok(hosts)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        serializer::export(&self.hosts()?, format)
    }

    fn persist(&self, hosts: &HostCollection) -> Result<()> {
        self.store.save(&stringify(hosts))
    }
}
