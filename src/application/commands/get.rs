//! Read-only chain queries: `get info`, `get block`, `get accounts`

use tracing::instrument;

use crate::application::commands::Command;
use crate::application::ApplicationResult;
use crate::domain::schema::{FieldDefault, FieldSpec, FieldType, OutputLine};
use crate::domain::{BlockRef, CommandSpec, DomainResult, Document};
use crate::infrastructure::traits::ChainOperations;

pub static GET_INFO: CommandSpec = CommandSpec {
    verb: "get",
    noun: "info",
    about: "Get current blockchain information.",
    fields: &[],
    output: &[
        OutputLine::new("head_block_num", "head block"),
        OutputLine::new("head_block_time", "head block time"),
        OutputLine::new("last_irreversible_block_num", "last irreversible block"),
    ],
};

pub static GET_BLOCK: CommandSpec = CommandSpec {
    verb: "get",
    noun: "block",
    about: "Retrieve a full block from the blockchain.",
    fields: &[
        FieldSpec::new("blockNumber", FieldType::Integer)
            .short('n')
            .positional()
            .default(FieldDefault::Int(0))
            .help("The number of the block to retrieve"),
        FieldSpec::new("blockId", FieldType::String)
            .short('i')
            .default(FieldDefault::Str(""))
            .help("The ID of the block to retrieve; wins over the number"),
    ],
    output: &[
        OutputLine::new("block_num", "block number"),
        OutputLine::new("timestamp", "timestamp"),
        OutputLine::new("producer", "producer"),
    ],
};

pub static GET_ACCOUNTS: CommandSpec = CommandSpec {
    verb: "get",
    noun: "accounts",
    about: "Retrieve accounts associated with a public key.",
    fields: &[FieldSpec::new("key", FieldType::String)
        .short('k')
        .positional()
        .help("The public key to retrieve accounts for")],
    output: &[OutputLine::new("account_names", "accounts")],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInfo;

impl GetInfo {
    pub fn build(_request: &Document) -> DomainResult<Self> {
        Ok(Self)
    }
}

impl Command for GetInfo {
    fn spec(&self) -> &'static CommandSpec {
        &GET_INFO
    }

    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document> {
        ops.get_info()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBlock {
    pub block: BlockRef,
}

impl GetBlock {
    pub fn build(request: &Document) -> DomainResult<Self> {
        let number: u64 = request.get("blockNumber")?;
        let id: String = request.get("blockId")?;
        Ok(Self {
            block: BlockRef::new(number, &id),
        })
    }
}

impl Command for GetBlock {
    fn spec(&self) -> &'static CommandSpec {
        &GET_BLOCK
    }

    #[instrument(skip(ops), fields(block = %self.block))]
    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document> {
        ops.get_block(&self.block)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccounts {
    pub key: String,
}

impl GetAccounts {
    pub fn build(request: &Document) -> DomainResult<Self> {
        Ok(Self {
            key: request.get("key")?,
        })
    }
}

impl Command for GetAccounts {
    fn spec(&self) -> &'static CommandSpec {
        &GET_ACCOUNTS
    }

    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document> {
        ops.get_accounts(&self.key)
    }
}
