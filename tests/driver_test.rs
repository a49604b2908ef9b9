//! Tests for OptionsDriver: resolve, validate, execute, render

use std::sync::{Arc, Mutex};

use rstest::rstest;
use serde_json::Value;
use tempfile::TempDir;

use teos::application::{
    ApplicationError, ApplicationResult, CommandKind, InputError, OptionsDriver, ValidationError,
};
use teos::config::Settings;
use teos::domain::{BlockRef, Document, NewAccount};
use teos::infrastructure::traits::{ChainOperations, RealFileSystem};
use teos::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// Mock chain that records each call and answers with a canned response
struct MockChain {
    calls: Mutex<Vec<String>>,
    accounts: Mutex<Vec<NewAccount>>,
    response: Option<Document>,
}

impl MockChain {
    fn new(response: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            accounts: Mutex::new(Vec::new()),
            response: Some(Document::from_json_str(response).unwrap()),
        }
    }

    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            accounts: Mutex::new(Vec::new()),
            response: None,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: String) -> ApplicationResult<Document> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.response {
            Some(doc) => Ok(doc.clone()),
            None => Err(ApplicationError::execution(call, "node unreachable")),
        }
    }
}

impl ChainOperations for MockChain {
    fn create_key(&self, name: &str) -> ApplicationResult<Document> {
        self.answer(format!("create_key {name}"))
    }

    fn create_account(&self, account: &NewAccount) -> ApplicationResult<Document> {
        self.accounts.lock().unwrap().push(account.clone());
        self.answer(format!("create_account {}", account.name))
    }

    fn get_info(&self) -> ApplicationResult<Document> {
        self.answer("get_info".into())
    }

    fn get_block(&self, block: &BlockRef) -> ApplicationResult<Document> {
        self.answer(format!("get_block {block}"))
    }

    fn get_accounts(&self, public_key: &str) -> ApplicationResult<Document> {
        self.answer(format!("get_accounts {public_key}"))
    }
}

fn driver_with(chain: Arc<MockChain>, settings: Settings) -> OptionsDriver {
    OptionsDriver::new(Arc::new(settings), Arc::new(RealFileSystem), chain)
}

fn driver(chain: Arc<MockChain>) -> OptionsDriver {
    driver_with(chain, Settings::default())
}

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const KEY_RESPONSE: &str = r#"{"privateKey":"PVT_K1_secret","publicKey":"PUB_K1_public"}"#;
const TX_RESPONSE: &str =
    r#"{"transaction_id":"a1b2","processed":{"block_num":42,"elapsed":1500}}"#;

// ------------------------------------------------------------
// Resolve
// ------------------------------------------------------------

#[test]
fn given_positional_and_json_input_when_resolving_then_documents_are_equal() {
    // Arrange
    let driver = driver(Arc::new(MockChain::new("{}")));
    let positional = tokens(&["alice", "bob", "OWNER", "ACTIVE", "--expiration", "60"]);
    let json = tokens(&[
        "-j",
        r#"{"creator":"alice","name":"bob","ownerKey":"OWNER","activeKey":"ACTIVE","expiration":60}"#,
    ]);

    // Act
    let from_tokens = driver.resolve(CommandKind::CreateAccount, &positional).unwrap();
    let from_json = driver.resolve(CommandKind::CreateAccount, &json).unwrap();

    // Assert
    assert_eq!(from_tokens, from_json);
    assert_eq!(from_tokens.get::<i64>("expiration").unwrap(), 60);
    assert_eq!(from_tokens.get::<i64>("deposit").unwrap(), 1);
    assert!(!from_tokens.get::<bool>("skip").unwrap());
}

#[test]
fn given_string_typed_json_when_resolving_then_values_take_declared_types() {
    // Arrange
    let driver = driver(Arc::new(MockChain::new("{}")));
    let positional = tokens(&["alice", "bob", "OWNER", "ACTIVE", "-x", "60", "--skip=true"]);
    let json = tokens(&[
        "-j",
        r#"{"creator":"alice","name":"bob","ownerKey":"OWNER","activeKey":"ACTIVE","expiration":"60","skip":"true"}"#,
    ]);

    // Act
    let from_tokens = driver.resolve(CommandKind::CreateAccount, &positional).unwrap();
    let from_json = driver.resolve(CommandKind::CreateAccount, &json).unwrap();

    // Assert
    assert_eq!(from_tokens, from_json);
    assert_eq!(from_json.value("expiration"), Some(&Value::from(60)));
    assert_eq!(from_json.value("skip"), Some(&Value::Bool(true)));
}

#[test]
fn given_numeric_json_name_when_resolving_create_key_then_name_is_a_string() {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let from_tokens = driver.resolve(CommandKind::CreateKey, &tokens(&["123"])).unwrap();
    let from_json = driver
        .resolve(CommandKind::CreateKey, &tokens(&["-j", r#"{"name":123}"#]))
        .unwrap();

    assert_eq!(from_tokens, from_json);
    assert_eq!(from_json.value("name"), Some(&Value::from("123")));
}

#[test]
fn given_json_without_optional_fields_when_resolving_then_defaults_are_applied() {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let request = driver
        .resolve(
            CommandKind::CreateAccount,
            &tokens(&[
                "--json",
                r#"{"creator":"alice","name":"bob","ownerKey":"OWNER","activeKey":"ACTIVE"}"#,
            ]),
        )
        .unwrap();

    assert!(!request.get::<bool>("skip").unwrap());
    assert_eq!(request.get::<i64>("expiration").unwrap(), 30);
    assert_eq!(request.get::<i64>("deposit").unwrap(), 1);
}

#[test]
fn given_same_tokens_when_resolving_twice_then_documents_are_equal() {
    let driver = driver(Arc::new(MockChain::new("{}")));
    let input = tokens(&["alice", "bob", "-o", "OWNER", "-a", "ACTIVE", "--skip"]);

    let first = driver.resolve(CommandKind::CreateAccount, &input).unwrap();
    let second = driver.resolve(CommandKind::CreateAccount, &input).unwrap();

    assert_eq!(first, second);
    assert!(first.get::<bool>("skip").unwrap());
}

#[test]
fn given_only_a_name_when_resolving_create_key_then_document_holds_only_name() {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let request = driver
        .resolve(CommandKind::CreateKey, &tokens(&["owner"]))
        .unwrap();

    assert_eq!(request, Document::from_json_str(r#"{"name":"owner"}"#).unwrap());
}

#[test]
fn given_json_and_tokens_when_resolving_then_tokens_are_ignored() {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let request = driver
        .resolve(
            CommandKind::CreateKey,
            &tokens(&["ignored", "-j", r#"{"name":"from-json"}"#]),
        )
        .unwrap();

    assert_eq!(request.get::<String>("name").unwrap(), "from-json");
}

#[test]
fn given_json_file_when_resolving_then_reads_request_from_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("request.json");
    std::fs::write(&path, r#"{"key":"PUB_K1_public"}"#).unwrap();
    let driver = driver(Arc::new(MockChain::new("{}")));

    // Act
    let request = driver
        .resolve(
            CommandKind::GetAccounts,
            &tokens(&["--json-file", path.to_str().unwrap()]),
        )
        .unwrap();

    // Assert
    assert_eq!(request.get::<String>("key").unwrap(), "PUB_K1_public");
}

#[test]
fn given_missing_json_file_when_resolving_then_file_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");
    let driver = driver(Arc::new(MockChain::new("{}")));

    let err = driver
        .resolve(
            CommandKind::GetAccounts,
            &tokens(&["--json-file", path.to_str().unwrap()]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Input(InputError::FileNotFound(ref p)) if *p == path
    ));
}

#[test]
fn given_malformed_json_file_when_resolving_then_malformed_json_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("request.json");
    std::fs::write(&path, r#"{"key": "PUB_K1_public""#).unwrap();
    let driver = driver(Arc::new(MockChain::new("{}")));

    let err = driver
        .resolve(
            CommandKind::GetAccounts,
            &tokens(&["--json-file", path.to_str().unwrap()]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Input(InputError::MalformedJson { ref origin, .. })
            if origin.ends_with("request.json")
    ));
}

#[rstest]
#[case::not_json("{creator: alice}")]
#[case::not_an_object("[1, 2, 3]")]
#[case::truncated(r#"{"creator":"alice""#)]
fn given_malformed_json_when_resolving_then_malformed_json_error(#[case] text: &str) {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let err = driver
        .resolve(CommandKind::CreateAccount, &tokens(&["-j", text]))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Input(InputError::MalformedJson { .. })
    ));
}

#[rstest]
#[case::unknown_flag(&["alice", "--colour", "red"], "unknown flag")]
#[case::bad_integer(&["a", "b", "c", "d", "-x", "soon"], "integer")]
#[case::too_many(&["a", "b", "c", "d", "e"], "unexpected argument")]
#[case::both_json_sources(&["-j", "{}", "--json-file", "r.json"], "cannot be used together")]
fn given_bad_tokens_when_resolving_then_input_error(#[case] input: &[&str], #[case] message: &str) {
    let driver = driver(Arc::new(MockChain::new("{}")));

    let err = driver
        .resolve(CommandKind::CreateAccount, &tokens(input))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Input(_)), "got {err:?}");
    assert!(err.to_string().contains(message), "got '{err}'");
}

// ------------------------------------------------------------
// Run
// ------------------------------------------------------------

#[test]
fn given_creator_and_name_only_when_running_create_account_then_missing_owner_key() {
    // Arrange
    let chain = Arc::new(MockChain::new(TX_RESPONSE));
    let driver = driver(Arc::clone(&chain));

    // Act
    let err = driver
        .run(CommandKind::CreateAccount, &tokens(&["alice", "bob"]))
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Validation(ValidationError::MissingField { ref field, .. })
            if field == "ownerKey"
    ));
    assert!(chain.calls().is_empty(), "no operation may run");
}

#[test]
fn given_json_without_owner_key_when_running_create_account_then_no_operation_runs() {
    // Arrange
    let chain = Arc::new(MockChain::new(TX_RESPONSE));
    let driver = driver(Arc::clone(&chain));

    // Act
    let err = driver
        .run(
            CommandKind::CreateAccount,
            &tokens(&["-j", r#"{"creator":"alice","name":"bob","activeKey":"ACTIVE"}"#]),
        )
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Validation(ValidationError::MissingField { ref field, .. })
            if field == "ownerKey"
    ));
    assert!(chain.calls().is_empty(), "no operation may run");
}

#[test]
fn given_json_file_with_mistyped_skip_when_running_create_account_then_no_operation_runs() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("account.json");
    std::fs::write(
        &path,
        r#"{"creator":"alice","name":"bob","ownerKey":"OWNER","activeKey":"ACTIVE","skip":"maybe"}"#,
    )
    .unwrap();
    let chain = Arc::new(MockChain::new(TX_RESPONSE));
    let driver = driver(Arc::clone(&chain));

    // Act
    let err = driver
        .run(
            CommandKind::CreateAccount,
            &tokens(&["--json-file", path.to_str().unwrap()]),
        )
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Validation(ValidationError::FieldTypeMismatch { ref field, .. })
            if field == "skip"
    ));
    assert!(chain.calls().is_empty(), "no operation may run");
}

#[test]
fn given_complete_request_when_running_create_account_then_operation_receives_values() {
    // Arrange
    let chain = Arc::new(MockChain::new(TX_RESPONSE));
    let driver = driver(Arc::clone(&chain));

    // Act
    let rendered = driver
        .run(
            CommandKind::CreateAccount,
            &tokens(&["alice", "bob", "OWNER", "ACTIVE", "-s", "-x", "90"]),
        )
        .unwrap();

    // Assert
    let accounts = chain.accounts.lock().unwrap();
    assert_eq!(
        accounts.as_slice(),
        &[NewAccount {
            creator: "alice".into(),
            name: "bob".into(),
            owner_key: "OWNER".into(),
            active_key: "ACTIVE".into(),
            skip_signature: true,
            expiration_sec: 90,
            deposit: 1,
        }]
    );
    assert_eq!(
        rendered.text,
        [
            "##       transaction id: a1b2",
            "##         block number: 42",
            "##              elapsed: 1500 us",
        ]
        .join("\n")
    );
}

#[test]
fn given_key_response_when_running_create_key_then_three_labeled_lines_in_order() {
    let chain = Arc::new(MockChain::new(KEY_RESPONSE));
    let driver = driver(Arc::clone(&chain));

    let rendered = driver
        .run(CommandKind::CreateKey, &tokens(&["alice"]))
        .unwrap();

    assert_eq!(chain.calls(), vec!["create_key alice"]);
    let lines: Vec<&str> = rendered.text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "##             key name: alice",
            "##          private key: PVT_K1_secret",
            "##           public key: PUB_K1_public",
        ]
    );
}

#[test]
fn given_raw_flag_when_running_create_key_then_exact_json_of_response() {
    let driver = driver(Arc::new(MockChain::new(KEY_RESPONSE)));

    let rendered = driver
        .run(CommandKind::CreateKey, &tokens(&["alice", "--raw"]))
        .unwrap();

    assert!(rendered.raw);
    assert_eq!(
        rendered.text,
        r#"{"name":"alice","privateKey":"PVT_K1_secret","publicKey":"PUB_K1_public"}"#
    );
    assert_eq!(
        Document::from_json_str(&rendered.text).unwrap(),
        rendered.response
    );
}

#[test]
fn given_raw_setting_when_running_then_output_is_raw_json() {
    let settings = Settings {
        raw: true,
        ..Settings::default()
    };
    let driver = driver_with(Arc::new(MockChain::new(r#"{"head_block_num":7}"#)), settings);

    let rendered = driver.run(CommandKind::GetInfo, &[]).unwrap();

    assert_eq!(rendered.text, r#"{"head_block_num":7}"#);
}

#[test]
fn given_partial_response_when_rendering_then_missing_fields_show_placeholder() {
    let driver = driver(Arc::new(MockChain::new(r#"{"head_block_num":7}"#)));

    let rendered = driver.run(CommandKind::GetInfo, &[]).unwrap();

    let lines: Vec<&str> = rendered.text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "##           head block: 7");
    assert!(lines[1].ends_with("head block time: <none>"));
    assert!(lines[2].ends_with("last irreversible block: <none>"));
}

#[test]
fn given_failing_operation_when_running_then_execution_error_is_returned_unchanged() {
    let chain = Arc::new(MockChain::failing());
    let driver = driver(Arc::clone(&chain));

    let err = driver
        .run(CommandKind::GetAccounts, &tokens(&["PUB_K1_public"]))
        .unwrap_err();

    assert_eq!(chain.calls(), vec!["get_accounts PUB_K1_public"]);
    match err {
        ApplicationError::Execution {
            command, message, ..
        } => {
            assert_eq!(command, "get_accounts PUB_K1_public");
            assert_eq!(message, "node unreachable");
        }
        other => panic!("expected execution error, got {other:?}"),
    }
}

#[rstest]
#[case::by_number(&["12"], "get_block 12")]
#[case::by_id(&["--blockId", "00000c"], "get_block 00000c")]
#[case::id_wins(&["12", "-i", "00000c"], "get_block 00000c")]
fn given_block_reference_when_running_get_block_then_operation_gets_it(
    #[case] input: &[&str],
    #[case] expected: &str,
) {
    let chain = Arc::new(MockChain::new(r#"{"block_num":12}"#));
    let driver = driver(Arc::clone(&chain));

    driver.run(CommandKind::GetBlock, &tokens(input)).unwrap();

    assert_eq!(chain.calls(), vec![expected]);
}
