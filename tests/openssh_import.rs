//! Integration tests: OpenSSH config import

use std::fs;

use tempfile::TempDir;

use hostbook::config::ConfigError;
use hostbook::import_openssh_config;

const SSH_CONFIG: &str = r#"
Host *
    User fallback
    Port 22

Host web*
    User deploy

Host web1
    HostName 192.0.2.11
    IdentityFile ~/.ssh/web_ed25519
    Certificate ~/.ssh/web_ed25519-cert.pub

Host db1 db2
    HostName db.internal
    Port 5022
    IdentityFile ~/.ssh/db
    ProxyCommand ssh -W %h:%p bastion
    LocalCommand logger connecting

Host hsm
    HostName hsm.internal
    PKCS11Provider /usr/lib/opensc-pkcs11.so
"#;

#[test]
fn test_import_namespaces_by_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, SSH_CONFIG).unwrap();
    let path_str = path.to_string_lossy().to_string();

    let profiles = import_openssh_config(&path_str).unwrap();

    let keys: Vec<String> = profiles.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            format!("{}:db1", path_str),
            format!("{}:db2", path_str),
            format!("{}:hsm", path_str),
            format!("{}:web1", path_str),
        ]
    );
    assert!(!profiles.contains_key(&format!("{}:web*", path_str)));
    assert!(!profiles.contains_key(&format!("{}:*", path_str)));
}

#[test]
fn test_import_resolves_directives() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, SSH_CONFIG).unwrap();
    let path_str = path.to_string_lossy().to_string();

    let profiles = import_openssh_config(&path_str).unwrap();

    // `Host *` precedes `Host web*`, so its User wins
    let web1 = &profiles[&format!("{}:web1", path_str)];
    assert_eq!(web1.addr, "192.0.2.11");
    assert_eq!(web1.user, "fallback");
    assert_eq!(web1.port, "22");
    assert_eq!(web1.cert, "~/.ssh/web_ed25519-cert.pub");
    assert_eq!(web1.certkey, "~/.ssh/web_ed25519");
    assert_eq!(web1.key, "");
    assert_eq!(web1.note, format!("from: {}", path_str));

    let db2 = &profiles[&format!("{}:db2", path_str)];
    assert_eq!(db2.addr, "db.internal");
    assert_eq!(db2.port, "22");
    assert_eq!(db2.key, "~/.ssh/db");
    assert_eq!(db2.proxy_cmd, "ssh -W %h:%p bastion");
    assert_eq!(db2.pre_cmd, "logger connecting");

    let hsm = &profiles[&format!("{}:hsm", path_str)];
    assert!(hsm.pkcs11);
    assert_eq!(hsm.pkcs11provider, "/usr/lib/opensc-pkcs11.so");
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent");

    let err = import_openssh_config(&path.to_string_lossy()).unwrap_err();
    assert!(matches!(err, ConfigError::ForeignRead { .. }));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, "Host ok\n  HostName ok\n  Port\n").unwrap();

    let err = import_openssh_config(&path.to_string_lossy()).unwrap_err();
    match err {
        ConfigError::ForeignParse { source, .. } => assert_eq!(source.line, 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_empty_certificate_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, "Host a\n  IdentityFile ~/.ssh/a\n  Certificate \"\"\n").unwrap();

    let err = import_openssh_config(&path.to_string_lossy()).unwrap_err();
    match err {
        ConfigError::ForeignParse { source, .. } => assert_eq!(source.line, 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_utf8_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

    let err = import_openssh_config(&path.to_string_lossy()).unwrap_err();
    match err {
        ConfigError::ForeignParse { source, .. } => assert_eq!(source.line, 1),
        other => panic!("unexpected error: {}", other),
    }
}
