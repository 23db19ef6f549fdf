//! # Pass Interfaces
//!
//! The traits every analysis and transformation implements, the error type
//! they report, and the parameter storage they read their options from.
//! Scheduling passes is left to the embedding compiler.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{Context, Func};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PassErrorKind {
    #[error("analysis error")]
    AnalysisError,
}

#[derive(Debug, Error)]
#[error("{kind} on {pass_name}: {err}")]
pub struct PassError {
    kind: PassErrorKind,
    #[source]
    err: Box<dyn std::error::Error + Send + Sync>,
    pass_name: String,
}

pub type PassResult<T> = Result<T, PassError>;

impl PassError {
    pub fn analysis_error(
        pass_name: impl Into<String>,
        err: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            kind: PassErrorKind::AnalysisError,
            err,
            pass_name: pass_name.into(),
        }
    }

    pub fn kind(&self) -> PassErrorKind { self.kind }

    pub fn pass_name(&self) -> &str { &self.pass_name }

    /// The underlying error, for downcasting.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) { self.err.as_ref() }
}

/// A pass that can be run on a function.
pub trait LocalPass {
    /// The output of the pass.
    type Output;

    /// Run the pass on the given function.
    fn run(&mut self, ctx: &Context, func: Func) -> PassResult<Self::Output>;

    fn fetch_params(&mut self, _params: &ParamStorage) {}
}

/// A pass that can be run on a function and modify it.
pub trait LocalPassMut {
    /// The output of the pass.
    type Output;

    /// Run the pass on the given function and maybe modify it.
    ///
    /// # Returns
    ///
    /// A tuple of the output of the pass and a boolean indicating whether the
    /// IR has been modified.
    fn run(&mut self, ctx: &mut Context, func: Func) -> PassResult<(Self::Output, bool)>;

    fn fetch_params(&mut self, _params: &ParamStorage) {}
}

/// A pass that can be run on a whole context and modify it.
pub trait GlobalPassMut {
    /// The output of the pass.
    type Output;

    /// Run the pass on the given context and maybe modify it.
    ///
    /// # Returns
    ///
    /// A tuple of the output of the pass and a boolean indicating whether the
    /// IR has been modified.
    fn run(&mut self, ctx: &mut Context) -> PassResult<(Self::Output, bool)>;

    fn fetch_params(&mut self, _params: &ParamStorage) {}
}

/// Pass parameters, stored as strings and parsed on access.
#[derive(Default)]
pub struct ParamStorage {
    parameters: FxHashMap<String, String>,
}

impl ParamStorage {
    pub fn new() -> Self { Self::default() }

    /// Define a parameter, or reset it to `default` if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, default: impl ToString) {
        self.parameters.insert(name.into(), default.to_string());
    }

    /// Update an existing parameter.
    ///
    /// # Returns
    ///
    /// `false` if the parameter was never defined, in which case nothing is
    /// stored.
    pub fn set<T: ToString>(&mut self, name: impl AsRef<str>, value: T) -> bool {
        match self.parameters.get_mut(name.as_ref()) {
            Some(param) => {
                *param = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Get a parameter parsed as `T`.
    ///
    /// # Returns
    ///
    /// `None` if the parameter is undefined or does not parse.
    pub fn get<T: FromStr>(&self, name: impl AsRef<str>) -> Option<T> {
        self.parameters
            .get(name.as_ref())
            .and_then(|v| v.parse().ok())
    }
}
