//! Chain operations backed by the `cleos` command-line client
//!
//! Every call runs `cleos -u <node_url> [--wallet-url <url>] <subcommand>` and
//! parses its standard output into a document. A non-zero exit is an
//! execution error carrying cleos' stderr, or the exit status when stderr is
//! empty.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{BlockRef, Document, NewAccount};
use crate::infrastructure::traits::{ChainOperations, CommandRunner};
use crate::infrastructure::InfraError;

/// Deposit cleos applies implicitly; other values cannot be forwarded.
const DEFAULT_DEPOSIT: i64 = 1;

/// `ChainOperations` implemented by running cleos.
pub struct CleosOperations {
    cmd: Arc<dyn CommandRunner>,
    settings: Arc<Settings>,
}

impl CleosOperations {
    pub fn new(cmd: Arc<dyn CommandRunner>, settings: Arc<Settings>) -> Self {
        Self { cmd, settings }
    }

    /// Connection arguments placed before every subcommand.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = vec!["-u".to_string(), self.settings.node_url.clone()];
        if let Some(wallet) = &self.settings.wallet_url {
            args.push("--wallet-url".into());
            args.push(wallet.clone());
        }
        args
    }

    /// Run cleos and return its stdout.
    fn invoke(&self, command: &str, args: &[String]) -> ApplicationResult<String> {
        let mut all = self.base_args();
        all.extend(args.iter().cloned());
        let argv: Vec<&str> = all.iter().map(String::as_str).collect();
        debug!("invoke: {} {}", self.settings.cleos, argv.join(" "));

        let output = self.cmd.run(&self.settings.cleos, &argv).map_err(|e| {
            ApplicationError::Execution {
                command: command.to_string(),
                message: format!("cannot run {}: {}", self.settings.cleos, e),
                source: Some(Box::new(InfraError::io(
                    format!("run {}", self.settings.cleos),
                    e,
                ))),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("invoke: cleos failed with {}", output.status);
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.settings.cleos, output.status)
            } else {
                stderr
            };
            return Err(ApplicationError::execution(command, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn invoke_json(&self, command: &str, args: &[String]) -> ApplicationResult<Document> {
        let stdout = self.invoke(command, args)?;
        Document::from_json_str(&stdout).map_err(|e| {
            ApplicationError::execution(command, format!("unexpected cleos output: {e}"))
        })
    }
}

/// Value of a `Label: value` line in cleos' plain-text output.
fn labeled_value(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?m)^\s*{}:\s*(\S+)", regex::escape(label))).ok()?;
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse `cleos create key --to-console` output.
pub fn parse_key_pair(text: &str) -> Option<Document> {
    let private_key = labeled_value(text, "Private key")?;
    let public_key = labeled_value(text, "Public key")?;
    let mut doc = Document::new();
    doc.put("privateKey", private_key);
    doc.put("publicKey", public_key);
    Some(doc)
}

impl ChainOperations for CleosOperations {
    fn create_key(&self, name: &str) -> ApplicationResult<Document> {
        debug!("create_key: name={}", name);
        let stdout = self.invoke("create key", &["create".into(), "key".into(), "--to-console".into()])?;
        parse_key_pair(&stdout).ok_or_else(|| {
            ApplicationError::execution("create key", "unexpected cleos output: no key pair")
        })
    }

    fn create_account(&self, account: &NewAccount) -> ApplicationResult<Document> {
        debug!(
            "create_account: creator={}, name={}",
            account.creator, account.name
        );
        if account.deposit != DEFAULT_DEPOSIT {
            warn!(
                "cleos does not take an initial deposit, ignoring deposit={}",
                account.deposit
            );
        }

        let mut args = vec![
            "create".to_string(),
            "account".into(),
            account.creator.clone(),
            account.name.clone(),
            account.owner_key.clone(),
            account.active_key.clone(),
            "--json".into(),
            "--expiration".into(),
            account.expiration_sec.to_string(),
        ];
        if account.skip_signature {
            args.push("--skip-sign".into());
        }
        self.invoke_json("create account", &args)
    }

    fn get_info(&self) -> ApplicationResult<Document> {
        self.invoke_json("get info", &["get".into(), "info".into()])
    }

    fn get_block(&self, block: &BlockRef) -> ApplicationResult<Document> {
        debug!("get_block: block={}", block);
        self.invoke_json("get block", &["get".into(), "block".into(), block.to_string()])
    }

    fn get_accounts(&self, public_key: &str) -> ApplicationResult<Document> {
        debug!("get_accounts: key={}", public_key);
        self.invoke_json(
            "get accounts",
            &["get".into(), "accounts".into(), public_key.to_string()],
        )
    }
}
