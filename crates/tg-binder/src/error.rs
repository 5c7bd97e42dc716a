use tg_common::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("cannot find name '{name}' at {span}")]
    Unresolved { name: String, span: Span },

    #[error("cannot find type '{name}' at {span}")]
    UnknownType { name: String, span: Span },

    #[error("duplicate identifier '{name}' at {span}")]
    Duplicate { name: String, span: Span },

    /// Statements or function bodies nested past the declaration pass's
    /// limit. Nothing under `span` is declared.
    #[error("statements nested deeper than {limit} levels at {span}")]
    TooDeep { limit: u32, span: Span },
}

impl ScopeError {
    pub fn span(&self) -> Span {
        match self {
            ScopeError::Unresolved { span, .. }
            | ScopeError::UnknownType { span, .. }
            | ScopeError::Duplicate { span, .. }
            | ScopeError::TooDeep { span, .. } => *span,
        }
    }

    /// The offending name; empty for [`ScopeError::TooDeep`].
    pub fn name(&self) -> &str {
        match self {
            ScopeError::Unresolved { name, .. }
            | ScopeError::UnknownType { name, .. }
            | ScopeError::Duplicate { name, .. } => name,
            ScopeError::TooDeep { .. } => "",
        }
    }
}
