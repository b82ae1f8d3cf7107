//! Defines the error types related to the various phases of turning MathML into CHTML.
//!   - [`CompileError`] : problems in the MathML source (unknown element, wrong number of children, stray text).
//!   - [`Error`] : the crate-wide error, covering configuration, XML parsing, compilation and resource retries.
//!
//! Layout never fails: by the time the wrapper tree is built, the node tree has been normalised.

use std::fmt;
use thiserror::Error;

/// Result type for the crate-wide [`Error`]
pub type Result<T> = ::std::result::Result<T, Error>;
/// Result type for the [`CompileError`]
pub type CompileResult<T> = ::std::result::Result<T, CompileError>;

/// A resource that must be loaded before an operation can be completed.
/// Returned (never thrown) up to the caller's retry loop, which loads it and starts again from the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRequest {
    /// Entity definitions for names starting with the given letter.
    Entities(char),
    /// A named resource (e.g. extra font data).
    Named(String),
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceRequest::Entities(letter) => write!(f, "entities/{}", letter),
            ResourceRequest::Named(name)      => write!(f, "{}", name),
        }
    }
}

/// Problems with the MathML markup itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The element name is not a registered node kind.
    #[error("Unknown node type: {0}")]
    UnknownNodeKind(String),
    /// Non-whitespace text where only elements are allowed.
    #[error("Unexpected text node \"{text}\" in {kind}")]
    UnexpectedText { kind: String, text: String },
    /// The element has the wrong number of children.
    #[error("Wrong number of children for \"{kind}\" node: expected {expected}, found {found}")]
    WrongChildCount { kind: String, expected: usize, found: usize },
    /// The element is not allowed as a child of its parent (e.g. an `mtd` outside of a row).
    #[error("Children of \"{parent}\" can't include \"{kind}\"")]
    MisplacedChild { kind: String, parent: String },
    /// Attributes that are not valid for this element.
    #[error("Unknown attributes for {kind} node: {}", .names.join(", "))]
    UnknownAttributes { kind: String, names: Vec<String> },
    /// The top-level element is not `<math>`.
    #[error("MathML must be formed by a <math> element, not <{0}>")]
    NotMath(String),
    /// A source with no element in it.
    #[error("No MathML element found")]
    Empty,
}

impl CompileError {
    /// The short form shown inside an `merror` when full errors are turned off.
    pub fn short_message(&self) -> String {
        use self::CompileError::*;
        match self {
            UnknownNodeKind(kind)              => kind.clone(),
            UnexpectedText { kind, .. }        => kind.clone(),
            WrongChildCount { kind, .. }       => kind.clone(),
            MisplacedChild { kind, .. }        => kind.clone(),
            UnknownAttributes { kind, .. }     => kind.clone(),
            NotMath(kind)                      => kind.clone(),
            Empty                              => "math".to_string(),
        }
    }
}

/// A generic error type covering any error that may happen while configuring, compiling or typesetting.
#[derive(Error, Debug)]
pub enum Error {
    /// An option overlay named a key its target does not have.
    #[error("Invalid option \"{path}\" (no default value).")]
    UnknownOption {
        /// dotted path of the offending key
        path: String,
    },

    /// A merged option list could not be turned into its typed form.
    #[error("Invalid option value: {0}")]
    InvalidOption(#[from] serde_json::Error),

    /// The MathML source is not well-formed XML.
    #[error("MathML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The MathML is malformed and could not be repaired.
    #[error("MathML compile error: {0}")]
    Compile(#[from] CompileError),

    /// A resource must be loaded before the operation can be re-run.
    #[error("MathJax retry: waiting for {0}")]
    Retry(ResourceRequest),

    /// The retry loop gave up on a resource.
    #[error("Unable to load {0}")]
    ResourceFailed(ResourceRequest),
}

impl Error {
    /// Is this a request to load something and start again, rather than a genuine failure?
    pub fn is_retry(&self) -> bool {
        matches!(self, Error::Retry(_))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_are_the_source_of_the_crate_error() {
        use std::error::Error as _;
        let err = Error::from(CompileError::NotMath("mrow".into()));
        assert_eq!(err.to_string(), "MathML compile error: MathML must be formed by a <math> element, not <mrow>");
        let source = err.source().expect("compile error has a source");
        assert_eq!(source.to_string(), "MathML must be formed by a <math> element, not <mrow>");
    }

    #[test]
    fn retry_errors_are_distinguished() {
        assert!(Error::Retry(ResourceRequest::Entities('x')).is_retry());
        assert!(!Error::Compile(CompileError::Empty).is_retry());
    }

    #[test]
    fn messages() {
        let err = CompileError::WrongChildCount { kind: "mfrac".into(), expected: 2, found: 3 };
        assert_eq!(err.short_message(), "mfrac");
        assert_eq!(err.to_string(), "Wrong number of children for \"mfrac\" node: expected 2, found 3");
        let err = CompileError::UnknownAttributes { kind: "mi".into(), names: vec!["foo".into(), "bar".into()] };
        assert_eq!(err.to_string(), "Unknown attributes for mi node: foo, bar");
        assert_eq!(
            Error::UnknownOption { path: "b".into() }.to_string(),
            "Invalid option \"b\" (no default value)."
        );
    }
}
