//! `create account` and `create key`

use tracing::{debug, instrument};

use crate::application::commands::Command;
use crate::application::ApplicationResult;
use crate::domain::schema::{FieldDefault, FieldSpec, FieldType, OutputLine};
use crate::domain::{CommandSpec, DomainResult, Document, NewAccount};
use crate::infrastructure::traits::ChainOperations;

pub static CREATE_ACCOUNT: CommandSpec = CommandSpec {
    verb: "create",
    noun: "account",
    about: "Create a new account on the blockchain.",
    fields: &[
        FieldSpec::new("creator", FieldType::String)
            .short('c')
            .positional()
            .help("The name of the account creating the new account"),
        FieldSpec::new("name", FieldType::String)
            .short('n')
            .positional()
            .help("The name of the new account"),
        FieldSpec::new("ownerKey", FieldType::String)
            .short('o')
            .positional()
            .help("The owner public key for the account"),
        FieldSpec::new("activeKey", FieldType::String)
            .short('a')
            .positional()
            .help("The active public key for the account"),
        FieldSpec::new("skip", FieldType::Boolean)
            .short('s')
            .default(FieldDefault::Bool(false))
            .help("Do not sign the transaction with unlocked wallet keys"),
        FieldSpec::new("expiration", FieldType::Integer)
            .short('x')
            .default(FieldDefault::Int(30))
            .help("The time in seconds before the transaction expires"),
        FieldSpec::new("deposit", FieldType::Integer)
            .short('d')
            .default(FieldDefault::Int(1))
            .help("The initial deposit"),
    ],
    output: &[
        OutputLine::new("transaction_id", "transaction id"),
        OutputLine::new("processed.block_num", "block number"),
        OutputLine::new("processed.elapsed", "elapsed").format("{} us"),
    ],
};

pub static CREATE_KEY: CommandSpec = CommandSpec {
    verb: "create",
    noun: "key",
    about: "Create a new keypair and print the public and private keys.",
    fields: &[FieldSpec::new("name", FieldType::String)
        .short('n')
        .positional()
        .default(FieldDefault::Str("default"))
        .help("The name of the new key")],
    output: &[
        OutputLine::new("name", "key name"),
        OutputLine::new("privateKey", "private key"),
        OutputLine::new("publicKey", "public key"),
    ],
};

/// Creates a new account on the blockchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccount {
    pub account: NewAccount,
}

impl CreateAccount {
    pub fn build(request: &Document) -> DomainResult<Self> {
        Ok(Self {
            account: NewAccount {
                creator: request.get("creator")?,
                name: request.get("name")?,
                owner_key: request.get("ownerKey")?,
                active_key: request.get("activeKey")?,
                skip_signature: request.get("skip")?,
                expiration_sec: request.get("expiration")?,
                deposit: request.get("deposit")?,
            },
        })
    }
}

impl Command for CreateAccount {
    fn spec(&self) -> &'static CommandSpec {
        &CREATE_ACCOUNT
    }

    #[instrument(skip(ops), fields(name = %self.account.name))]
    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document> {
        ops.create_account(&self.account)
    }
}

/// Creates a key pair; the response carries the key name and both keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateKey {
    pub name: String,
}

impl CreateKey {
    pub fn build(request: &Document) -> DomainResult<Self> {
        Ok(Self {
            name: request.get("name")?,
        })
    }
}

impl Command for CreateKey {
    fn spec(&self) -> &'static CommandSpec {
        &CREATE_KEY
    }

    #[instrument(skip(ops), fields(name = %self.name))]
    fn execute(&self, ops: &dyn ChainOperations) -> ApplicationResult<Document> {
        let keys = ops.create_key(&self.name)?;

        let mut response = Document::new();
        response.put("name", self.name.clone());
        for field in ["privateKey", "publicKey"] {
            match keys.value(field) {
                Some(value) => response.put(field, value.clone()),
                None => debug!("create key: operation returned no {}", field),
            }
        }
        Ok(response)
    }
}
