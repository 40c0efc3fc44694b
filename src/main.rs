//! Hostbook CLI
//!
//! Entry point for the `hostbook` command-line tool.

use clap::{Parser, Subcommand};
use hostbook::config::{default_config_path, LogConfig};
use hostbook::openssh::DEFAULT_OPENSSH_CONFIG;
use hostbook::{import_openssh_config, load_config, logging, Profile, ResolvedRegistry};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "hostbook")]
#[command(about = "Resolve layered connection profiles", version)]
struct Cli {
    /// Path to config file (default: ~/.hostbook.toml)
    #[arg(long, short = 'c', global = true, env = "HOSTBOOK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resolved server names
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one resolved server profile
    Show {
        /// Server name
        name: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the configuration
    Check,

    /// Import hosts from an OpenSSH client config
    ImportSsh {
        /// Path to the OpenSSH config (default: ~/.ssh/config)
        path: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => {
            let registry = load_registry(cli.config);
            run_list(&registry, json);
        }
        Commands::Show { name, json } => {
            let registry = load_registry(cli.config);
            run_show(&registry, &name, json);
        }
        Commands::Check => {
            let registry = load_registry(cli.config);
            run_check(&registry);
        }
        Commands::ImportSsh { path, json } => {
            init_logging(None);
            run_import_ssh(path.as_deref().unwrap_or(DEFAULT_OPENSSH_CONFIG), json);
        }
    }
}

fn fail(err: impl Display) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}

/// Load the registry, logging to stderr until the config's own log
/// settings are known.
fn load_registry(config_path: Option<PathBuf>) -> ResolvedRegistry {
    let path = match config_path {
        Some(path) => path,
        None => default_config_path().unwrap_or_else(|e| fail(e)),
    };

    let loaded = match logging::subscriber(None) {
        Ok(subscriber) => tracing::subscriber::with_default(subscriber, || load_config(&path)),
        Err(_) => load_config(&path),
    };
    let registry = loaded.unwrap_or_else(|e| fail(e));

    init_logging(Some(registry.log()));
    registry
}

fn init_logging(log: Option<&LogConfig>) {
    match logging::subscriber(log) {
        Ok(subscriber) => subscriber.init(),
        Err(e) => {
            eprintln!("Warning: {}", e);
            if let Ok(subscriber) = logging::subscriber(None) {
                subscriber.init();
            }
        }
    }
}

fn run_list(registry: &ResolvedRegistry, json_output: bool) {
    if json_output {
        let output: Vec<serde_json::Value> = registry
            .iter()
            .map(|(name, p)| {
                serde_json::json!({
                    "name": name,
                    "addr": p.addr,
                    "user": p.user,
                    "port": p.port,
                    "note": p.note,
                })
            })
            .collect();
        print_json(&output);
        return;
    }

    if registry.is_empty() {
        println!("No servers configured.");
        return;
    }

    for name in registry.names() {
        println!("{}", name);
    }
}

fn run_show(registry: &ResolvedRegistry, name: &str, json_output: bool) {
    let profile = match registry.get(name) {
        Some(p) => p.redacted(),
        None => {
            eprintln!("Server '{}' not found.", name);
            eprintln!("Available servers: {}", registry.names().join(", "));
            process::exit(1);
        }
    };

    if json_output {
        print_json(&profile);
        return;
    }

    match registry.origin_of(name) {
        Some(source) => println!("{} (from {})", name, source.path.display()),
        None => println!("{}", name),
    }
    print_profile(&profile);
}

fn run_check(registry: &ResolvedRegistry) {
    println!("Configuration valid: {} servers", registry.len());
    println!();
    for source in registry.sources() {
        let label = source.name.as_deref().unwrap_or("(primary)");
        println!("  {} {}", label, source.path.display());
        println!("    sha256: {}", source.digest);
    }
}

fn run_import_ssh(path: &str, json_output: bool) {
    let profiles = import_openssh_config(path).unwrap_or_else(|e| fail(e));

    if json_output {
        let redacted: BTreeMap<&String, Profile> =
            profiles.iter().map(|(k, p)| (k, p.redacted())).collect();
        print_json(&redacted);
        return;
    }

    if profiles.is_empty() {
        println!("No concrete hosts found in {}.", path);
        return;
    }

    for (name, profile) in &profiles {
        println!("{}", name);
        print_profile(profile);
        println!();
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("serializing output: {}", e)),
    }
}

fn print_profile(p: &Profile) {
    let fields = [
        ("Address", &p.addr),
        ("Port", &p.port),
        ("User", &p.user),
        ("Password", &p.pass),
        ("Key", &p.key),
        ("Certificate", &p.cert),
        ("Certificate Key", &p.certkey),
        ("Pre Command", &p.pre_cmd),
        ("Post Command", &p.post_cmd),
        ("Proxy Server", &p.proxy_server),
        ("Proxy Command", &p.proxy_cmd),
        ("PKCS11 Provider", &p.pkcs11provider),
        ("Note", &p.note),
    ];

    for (label, value) in fields {
        if !value.is_empty() {
            println!("    {}: {}", label, value);
        }
    }
    if p.pkcs11 {
        println!("    PKCS11: enabled");
    }
}
