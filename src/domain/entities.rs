//! Domain entities: validated operation inputs

/// Parameters of a new blockchain account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Authorizing account
    pub creator: String,
    pub name: String,
    pub owner_key: String,
    pub active_key: String,
    /// Do not sign with unlocked wallet keys
    pub skip_signature: bool,
    pub expiration_sec: u32,
    pub deposit: i64,
}

/// Block selector: by number or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Number(u64),
    Id(String),
}

impl BlockRef {
    /// A non-empty id wins over the number.
    pub fn new(number: u64, id: &str) -> Self {
        if id.trim().is_empty() {
            BlockRef::Number(number)
        } else {
            BlockRef::Id(id.trim().to_string())
        }
    }
}

impl std::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRef::Number(n) => write!(f, "{n}"),
            BlockRef::Id(id) => f.write_str(id),
        }
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like setting.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
