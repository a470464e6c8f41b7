use crate::host::{HostCollection, HostRecord};

/// Parse the `Host` blocks of an OpenSSH client config.
///
/// Parsing never fails: blank lines, comments, lines before the first `Host`
/// and lines without a value are dropped. A key repeated inside one block
/// keeps its first position and its last value.
pub fn parse(text: &str) -> HostCollection {
    let mut hosts = HostCollection::new();
    let mut current: Option<HostRecord> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = split_directive(trimmed) else {
            continue;
        };

        if key.eq_ignore_ascii_case("host") {
            if let Some(host) = current.replace(HostRecord::new(value)) {
                hosts.push(host);
            }
        } else if let Some(ref mut host) = current {
            host.set(key, value);
        }
    }

    if let Some(host) = current {
        hosts.push(host);
    }

    hosts
}

/// Split a trimmed line into its keyword and the rest of the line.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(char::is_whitespace)?;
    let value = rest.trim_start();
    (!value.is_empty()).then_some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(host: &HostRecord) -> Vec<(&str, &str)> {
        host.options.iter().collect()
    }

    #[test]
    fn test_parse_single_host() {
        let content = "Host myserver
    HostName 192.168.1.100
    User root
    Port 22
";
        let hosts = parse(content);

        assert_eq!(hosts.len(), 1);
        let host = hosts.get("myserver").unwrap();
        assert_eq!(
            options(host),
            vec![("HostName", "192.168.1.100"), ("User", "root"), ("Port", "22")]
        );
    }

    #[test]
    fn test_parse_multiple_hosts_in_order() {
        let content = "# SSH Config file
Host web
    HostName web.example.com

Host db
    HostName db.example.com
    User postgres

Host *.internal
    User root";

        let hosts = parse(content);

        assert_eq!(hosts.names(), vec!["web", "db", "*.internal"]);
        assert_eq!(hosts.get("*.internal").unwrap().get("User"), Some("root"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n  ").is_empty());
        assert!(parse("# only a comment\n\n# and another\n").is_empty());
    }

    #[test]
    fn test_lines_before_first_host_are_ignored() {
        let content = "ServerAliveInterval 60
Include ~/.ssh/config.d/*

Host box
    User me
";
        let hosts = parse(content);

        assert_eq!(hosts.names(), vec!["box"]);
        assert_eq!(options(hosts.get("box").unwrap()), vec![("User", "me")]);
    }

    #[test]
    fn test_host_keyword_is_case_insensitive() {
        let hosts = parse("host lower\nHOST upper\n  hOsT   mixed  \n");
        assert_eq!(hosts.names(), vec!["lower", "upper", "mixed"]);
    }

    #[test]
    fn test_hostname_is_not_a_host_line() {
        let hosts = parse("Host a\nHostName a.example.com\n");
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts.get("a").unwrap().get("HostName"), Some("a.example.com"));
    }

    #[test]
    fn test_host_name_keeps_spaces_and_wildcards() {
        let hosts = parse("Host web-? db*  backup\n    User ops\n");
        assert_eq!(hosts.names(), vec!["web-? db*  backup"]);
    }

    #[test]
    fn test_host_without_name_is_ignored() {
        let hosts = parse("Host first\n    User a\nHost\n    Port 2222\n");
        assert_eq!(hosts.names(), vec!["first"]);
        assert_eq!(
            options(hosts.get("first").unwrap()),
            vec![("User", "a"), ("Port", "2222")]
        );
    }

    #[test]
    fn test_repeated_key_last_write_wins_in_place() {
        let content = "Host a
    Port 22
    User root
    Port 2222
";
        let hosts = parse(content);
        assert_eq!(
            options(hosts.get("a").unwrap()),
            vec![("Port", "2222"), ("User", "root")]
        );
    }

    #[test]
    fn test_value_keeps_inner_whitespace() {
        let hosts = parse("Host a\n    ProxyCommand ssh -W %h:%p  bastion   \n");
        assert_eq!(
            hosts.get("a").unwrap().get("ProxyCommand"),
            Some("ssh -W %h:%p  bastion")
        );
    }

    #[test]
    fn test_lines_without_value_are_dropped() {
        let hosts = parse("Host a\n    Compression\n    User me\n");
        assert_eq!(options(hosts.get("a").unwrap()), vec![("User", "me")]);
    }

    #[test]
    fn test_tabs_and_crlf() {
        let hosts = parse("Host\ta\r\n\tUser\troot\r\n");
        assert_eq!(hosts.names(), vec!["a"]);
        assert_eq!(hosts.get("a").unwrap().get("User"), Some("root"));
    }

    #[test]
    fn test_indented_comment_inside_block() {
        let hosts = parse("Host a\n    # User nobody\n    User me\n");
        assert_eq!(options(hosts.get("a").unwrap()), vec![("User", "me")]);
    }

    #[test]
    fn test_host_with_no_options() {
        let hosts = parse("Host empty\nHost full\n  User x\n");
        assert!(hosts.get("empty").unwrap().options.is_empty());
        assert_eq!(hosts.len(), 2);
    }
}
