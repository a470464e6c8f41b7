//! Rules for text that has to survive a trip through the config dialect.
//!
//! The checks return a bare message; the caller picks the error kind
//! (`Invalid` for editor input, `Shape` for an import).

use crate::host::HostRecord;

pub(crate) type Check = std::result::Result<(), String>;

/// A host name has to come back out of `Host <name>` unchanged.
pub(crate) fn check_name(name: &str) -> Check {
    if is_bare_text(name) {
        Ok(())
    } else {
        Err(format!("invalid host name {name:?}"))
    }
}

pub(crate) fn check_key(key: &str) -> Check {
    if key.is_empty()
        || key.contains(char::is_whitespace)
        || key.starts_with('#')
        || key.eq_ignore_ascii_case("host")
    {
        return Err(format!("invalid option name {key:?}"));
    }
    Ok(())
}

pub(crate) fn check_value(key: &str, value: &str) -> Check {
    if is_bare_text(value) {
        Ok(())
    } else {
        Err(format!("invalid value {value:?} for {key}"))
    }
}

/// Every name, key and value of `host`.
pub(crate) fn check_record(host: &HostRecord) -> Check {
    check_name(&host.name)?;
    for (key, value) in host.options.iter() {
        check_key(key)
            .and_then(|_| check_value(key, value))
            .map_err(|msg| format!("{msg} in host '{}'", host.name))?;
    }
    Ok(())
}

/// Non-empty, no surrounding whitespace, single line.
fn is_bare_text(s: &str) -> bool {
    !s.is_empty() && s.trim() == s && !s.contains(['\n', '\r'])
}
