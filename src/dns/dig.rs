//! Resolver that shells out to `dig`.
//!
//! Runs `dig [@server] <host> <TYPE> +noall +answer +cdflag` and parses the
//! answer section it prints. The exit status is never inspected: a `dig`
//! that cannot be spawned, or that prints nothing useful, simply yields no
//! records.

use super::{Name, Resolve, Resolving};
use crate::base::dnserror::DnsError;
use crate::record::{normalize, Record, RecordType};
use std::{path::PathBuf, process::Stdio, sync::Arc};
use tokio::process::Command;

/// Resolver backed by the `dig` command-line tool.
///
/// # Example
///
/// ```rust,ignore
/// use digrs::dns::{DigResolver, Name, Resolve};
/// use digrs::record::RecordType;
///
/// let resolver = DigResolver::with_server("1.1.1.1");
/// let records = resolver.resolve(Name::new("example.com"), RecordType::A).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DigResolver {
    config: Arc<DigConfig>,
}

#[derive(Debug)]
struct DigConfig {
    program: PathBuf,
    server: Option<String>,
}

impl DigResolver {
    /// Uses `dig` from `PATH` and the system's default name servers.
    pub fn new() -> Self {
        Self {
            config: Arc::new(DigConfig {
                program: PathBuf::from("dig"),
                server: None,
            }),
        }
    }

    /// Queries `server` instead of the system default. An `@` prefix is
    /// added when missing.
    pub fn with_server(server: impl Into<String>) -> Self {
        Self::new().server(server)
    }

    /// Sets the server to query.
    pub fn server(self, server: impl Into<String>) -> Self {
        let server = server.into();
        let server = if server.starts_with('@') {
            server
        } else {
            format!("@{server}")
        };
        self.map_config(|c| c.server = Some(server))
    }

    /// Runs `program` instead of `dig` from `PATH`.
    pub fn program(self, program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        self.map_config(|c| c.program = program)
    }

    /// The configured server, `@`-prefixed.
    pub fn server_arg(&self) -> Option<&str> {
        self.config.server.as_deref()
    }

    fn map_config(self, f: impl FnOnce(&mut DigConfig)) -> Self {
        let mut config = DigConfig {
            program: self.config.program.clone(),
            server: self.config.server.clone(),
        };
        f(&mut config);
        Self {
            config: Arc::new(config),
        }
    }

    fn args(&self, host: &str, rtype: RecordType) -> Vec<String> {
        let mut args = Vec::with_capacity(6);
        if let Some(server) = &self.config.server {
            args.push(server.clone());
        }
        args.push(host.to_string());
        args.push(rtype.as_str().to_string());
        args.extend(["+noall", "+answer", "+cdflag"].map(String::from));
        args
    }
}

impl Default for DigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for DigResolver {
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving {
        let args = self.args(name.as_str(), rtype);
        let config = self.config.clone();

        Box::pin(async move {
            tracing::debug!(host = %name, rtype = %rtype, "resolving via dig");

            let output = Command::new(&config.program)
                .args(&args)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output()
                .await;

            let output = match output {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(
                        program = %config.program.display(),
                        error = %e,
                        "failed to run dig, returning no records"
                    );
                    return Ok(Vec::new());
                }
            };

            let records = parse_answer(&String::from_utf8_lossy(&output.stdout))?;
            tracing::debug!(host = %name, rtype = %rtype, count = records.len(), "dig lookup complete");
            Ok::<_, DnsError>(records)
        })
    }
}

/// Parses the answer section printed by `dig +noall +answer`.
///
/// Empty lines and `;` comments are skipped. Tab runs separate columns:
/// owner name, TTL, class, type, then the payload.
pub fn parse_answer(output: &str) -> Result<Vec<Record>, DnsError> {
    let mut records = Vec::new();

    for line in output.lines() {
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let line = collapse_tabs(line);
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() < 4 {
            tracing::debug!(line = %line, "skipping short dig line");
            continue;
        }

        records.push(normalize(
            fields[0],
            fields[3],
            fields[1].parse().ok(),
            fields.get(4..).unwrap_or_default().join(" "),
        )?);
    }

    Ok(records)
}

fn collapse_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tabs = false;
    for c in line.chars() {
        if c == '\t' {
            if !in_tabs {
                out.push(' ');
            }
            in_tabs = true;
        } else {
            out.push(c);
            in_tabs = false;
        }
    }
    out
}
