//! Options driver: raw tokens in, rendered response out
//!
//! Per invocation the driver moves through
//! `Idle -> ArgsResolved -> Validated -> Executed -> Rendered`.
//! A failure while resolving or validating stops before any chain operation
//! is invoked, so an incomplete request never reaches a side-effecting call.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::commands::{Command, CommandKind};
use crate::application::render::render;
use crate::application::source::Invocation;
use crate::application::{ApplicationResult, ValidationError};
use crate::config::Settings;
use crate::domain::document::kind_of;
use crate::domain::{CommandSpec, Document};
use crate::infrastructure::traits::{ChainOperations, FileSystem};

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub command: String,
    pub request: Document,
    pub response: Document,
    pub raw: bool,
    pub text: String,
}

/// Resolves, validates, executes and renders commands.
pub struct OptionsDriver {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    ops: Arc<dyn ChainOperations>,
}

impl OptionsDriver {
    pub fn new(
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        ops: Arc<dyn ChainOperations>,
    ) -> Self {
        Self { settings, fs, ops }
    }

    /// Turn a command's raw tokens into a validated request document.
    ///
    /// Every declared field holds its declared type afterwards, so positional
    /// and JSON input meaning the same thing yield equal documents. Resolving
    /// the same tokens twice yields equal documents.
    pub fn resolve(&self, kind: CommandKind, tokens: &[String]) -> ApplicationResult<Document> {
        let invocation = Invocation::parse(tokens)?;
        self.resolve_invocation(kind.spec(), &invocation)
    }

    fn resolve_invocation(
        &self,
        spec: &CommandSpec,
        invocation: &Invocation,
    ) -> ApplicationResult<Document> {
        let mut request = invocation.source.resolve(spec, self.fs.as_ref())?;
        debug!("{}: args resolved: {}", spec.name(), request);

        spec.apply_defaults(&mut request);
        let request = normalize(spec, &request)?;
        debug!("{}: validated: {}", spec.name(), request);
        Ok(request)
    }

    /// Build a command from an already validated request.
    pub fn build(&self, kind: CommandKind, request: &Document) -> ApplicationResult<Box<dyn Command>> {
        Ok(kind.build(request)?)
    }

    /// Resolve, validate, build, execute and render one command.
    ///
    /// Execution errors from the chain operation are returned unchanged.
    #[instrument(skip(self, tokens), fields(command = %kind))]
    pub fn run(&self, kind: CommandKind, tokens: &[String]) -> ApplicationResult<Rendered> {
        let spec = kind.spec();
        let invocation = Invocation::parse(tokens)?;
        let raw = invocation.raw || self.settings.raw;

        let request = self.resolve_invocation(spec, &invocation)?;
        let command = self.build(kind, &request)?;

        let response = command.execute(self.ops.as_ref())?;
        debug!("{}: executed", spec.name());

        let text = render(&response, spec.output, raw);
        debug!("{}: rendered (raw={})", spec.name(), raw);

        Ok(Rendered {
            command: spec.name(),
            request,
            response,
            raw,
            text,
        })
    }
}

/// Check a request against the command's fields, in declaration order, and
/// return it with every declared field converted to its declared type.
///
/// Reports the first declared field that is missing while required, or that
/// holds a value which does not convert. Undeclared keys are kept as given.
pub fn normalize(spec: &CommandSpec, request: &Document) -> Result<Document, ValidationError> {
    let mut canonical = request.clone();
    for field in spec.fields {
        let Some(value) = request.value(field.name) else {
            if field.required() {
                return Err(ValidationError::MissingField {
                    command: spec.name(),
                    field: field.name.to_string(),
                });
            }
            continue;
        };
        let converted =
            field
                .kind
                .normalize(value)
                .ok_or_else(|| ValidationError::FieldTypeMismatch {
                    command: spec.name(),
                    field: field.name.to_string(),
                    expected: field.kind.name(),
                    found: kind_of(value).to_string(),
                })?;
        canonical.put(field.name, converted);
    }
    Ok(canonical)
}
