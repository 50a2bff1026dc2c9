use std::fmt;

/// A non-fatal condition noticed while reading input data.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A calculated standard error fell below the floor and was padded.
    UncertaintyPadded {
        tag: String,
        original: f64,
        padded: f64,
    },
    /// A ligand appeared more than once; the later row replaced the earlier one.
    DuplicateLigand { name: String, line: u64 },
    /// A calculated edge appeared more than once; the later row replaced the earlier one.
    DuplicateEdge { tag: String, line: u64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UncertaintyPadded { tag, original, .. } => write!(
                f,
                "Calculated standard deviation for {} is less than 0.01 ({}) - adding 0.01 padding",
                tag, original
            ),
            Diagnostic::DuplicateLigand { name, line } => write!(
                f,
                "Ligand '{}' is listed more than once; using the entry on line {}",
                name, line
            ),
            Diagnostic::DuplicateEdge { tag, line } => write!(
                f,
                "Edge '{}' is listed more than once; using the entry on line {}",
                tag, line
            ),
        }
    }
}

/// Parsed data together with the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub data: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub fn new(data: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { data, diagnostics }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.data, self.diagnostics)
    }
}
