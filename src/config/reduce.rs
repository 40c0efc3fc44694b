//! Field-level profile reduction
//!
//! Reduction merges a child profile onto its parent one field at a time:
//! - String fields: the child's value if non-empty, else the parent's
//! - `pkcs11`: set if either side sets it (`false` is the unset value)
//!
//! The child is destructured without `..`, so adding a field to
//! [`Profile`] fails to compile until it is handled here.

use super::profile::Profile;

/// Reduce `child` against `parent`; the child wins wherever it is set.
pub fn reduce(parent: &Profile, child: &Profile) -> Profile {
    let Profile {
        addr,
        port,
        user,
        pass,
        key,
        cert,
        certkey,
        pre_cmd,
        post_cmd,
        proxy_server,
        proxy_cmd,
        note,
        pkcs11,
        pkcs11provider,
    } = child;

    Profile {
        addr: inherit(&parent.addr, addr),
        port: inherit(&parent.port, port),
        user: inherit(&parent.user, user),
        pass: inherit(&parent.pass, pass),
        key: inherit(&parent.key, key),
        cert: inherit(&parent.cert, cert),
        certkey: inherit(&parent.certkey, certkey),
        pre_cmd: inherit(&parent.pre_cmd, pre_cmd),
        post_cmd: inherit(&parent.post_cmd, post_cmd),
        proxy_server: inherit(&parent.proxy_server, proxy_server),
        proxy_cmd: inherit(&parent.proxy_cmd, proxy_cmd),
        note: inherit(&parent.note, note),
        pkcs11: *pkcs11 || parent.pkcs11,
        pkcs11provider: inherit(&parent.pkcs11provider, pkcs11provider),
    }
}

fn inherit(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else {
        child.to_string()
    }
}
