//! Strategies for metadata fields that no source supplies.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::{Error, Result};
use crate::model::{Field, MetadataField};

/// Supplies a value for a field that every source left empty.
pub trait MissingFieldResolver {
    /// Produce a value for `field`.
    fn resolve(&mut self, field: MetadataField) -> Result<Field>;
}

impl<T: MissingFieldResolver + ?Sized> MissingFieldResolver for Box<T> {
    fn resolve(&mut self, field: MetadataField) -> Result<Field> {
        (**self).resolve(field)
    }
}

/// Non-interactive strategy: every missing field becomes `Undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForcedResolver;

impl MissingFieldResolver for ForcedResolver {
    fn resolve(&mut self, field: MetadataField) -> Result<Field> {
        log::debug!("No value for \"{}\", using {}", field.label(), Field::UNDEFINED);
        Ok(Field::Undefined)
    }
}

/// Interactive strategy: asks an operator for each missing field.
///
/// Blocks on `input` until a line is read. An empty answer yields `Undefined`.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<BufReader<Stdin>, Stdout> {
    /// Prompt on the process console.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    /// Prompt on arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the resolver and return its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> MissingFieldResolver for PromptResolver<R, W> {
    fn resolve(&mut self, field: MetadataField) -> Result<Field> {
        write!(self.output, "Insert metadata \"{}\": ", field.label())
            .and_then(|_| self.output.flush())
            .map_err(|e| Error::Prompt(e.to_string()))?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .map_err(|e| Error::Prompt(e.to_string()))?;
        if read == 0 {
            return Err(Error::Prompt(format!(
                "input closed while asking for \"{}\"",
                field.label()
            )));
        }

        Ok(Field::from_option(Some(answer.trim_end_matches(['\r', '\n']).to_string())))
    }
}

/// How the fallback for missing fields behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Ask the operator on the console
    #[default]
    Interactive,
    /// Never ask; use the `Undefined` sentinel
    Forced,
}

impl RunMode {
    /// Select a mode from the CLI force flag.
    pub fn from_force_flag(force: bool) -> Self {
        if force {
            RunMode::Forced
        } else {
            RunMode::Interactive
        }
    }

    /// The strategy for this mode.
    pub fn resolver(self) -> Box<dyn MissingFieldResolver> {
        match self {
            RunMode::Forced => Box::new(ForcedResolver),
            RunMode::Interactive => Box::new(PromptResolver::stdio()),
        }
    }
}
