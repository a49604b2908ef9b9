//! Commands: build from a validated request, execute against the chain
//!
//! Each command has a static `CommandSpec` and a two-phase lifecycle:
//! `build` reads typed values out of the request document, `execute` invokes
//! exactly one chain operation and returns the response document.

mod create;
mod get;

use std::fmt;

use crate::application::ApplicationResult;
use crate::domain::{CommandSpec, DomainResult, Document};
use crate::infrastructure::traits::ChainOperations;

pub use create::{CreateAccount, CreateKey, CREATE_ACCOUNT, CREATE_KEY};
pub use get::{GetAccounts, GetBlock, GetInfo, GET_ACCOUNTS, GET_BLOCK, GET_INFO};

/// A built command, ready to execute.
pub trait Command: fmt::Debug {
    fn spec(&self) -> &'static CommandSpec;

    /// Run the chain operation and return its response.
    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document>;
}

/// Every command known to the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    CreateAccount,
    CreateKey,
    GetInfo,
    GetBlock,
    GetAccounts,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::CreateAccount,
        CommandKind::CreateKey,
        CommandKind::GetInfo,
        CommandKind::GetBlock,
        CommandKind::GetAccounts,
    ];

    pub fn spec(self) -> &'static CommandSpec {
        match self {
            CommandKind::CreateAccount => &CREATE_ACCOUNT,
            CommandKind::CreateKey => &CREATE_KEY,
            CommandKind::GetInfo => &GET_INFO,
            CommandKind::GetBlock => &GET_BLOCK,
            CommandKind::GetAccounts => &GET_ACCOUNTS,
        }
    }

    /// Build the command from a request document.
    ///
    /// The request is only read. A missing or mistyped field fails here,
    /// before anything is executed.
    pub fn build(self, request: &Document) -> DomainResult<Box<dyn Command>> {
        Ok(match self {
            CommandKind::CreateAccount => Box::new(CreateAccount::build(request)?),
            CommandKind::CreateKey => Box::new(CreateKey::build(request)?),
            CommandKind::GetInfo => Box::new(GetInfo::build(request)?),
            CommandKind::GetBlock => Box::new(GetBlock::build(request)?),
            CommandKind::GetAccounts => Box::new(GetAccounts::build(request)?),
        })
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec().name())
    }
}
