//! Diagnostics shared by the binder and the checker.
//!
//! Errors are typed enums inside each crate; they are converted into these
//! plain records at the driver boundary so tooling can consume them without
//! depending on the checker's error types.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const CANNOT_FIND_NAME: u32 = 1001;
    pub const CANNOT_FIND_TYPE: u32 = 1002;
    pub const DUPLICATE_IDENTIFIER: u32 = 1003;
    pub const EXPECTED_ARGUMENTS: u32 = 2001;
    pub const ARGUMENT_NOT_ASSIGNABLE: u32 = 2002;
    pub const TYPE_ARGUMENT_CONSTRAINT: u32 = 2003;
    pub const PROPERTY_DOES_NOT_EXIST: u32 = 2005;
    pub const INVALID_INDEX_TYPE: u32 = 2006;
    pub const NOT_CALLABLE: u32 = 2007;
    pub const EXPRESSION_TOO_DEEP: u32 = 3001;
    pub const INTERNAL_ERROR: u32 = 9001;
}

pub mod diagnostic_messages {
    pub const CANNOT_FIND_NAME: &str = "Cannot find name '{0}'.";
    pub const CANNOT_FIND_TYPE: &str = "Cannot find type '{0}'.";
    pub const DUPLICATE_IDENTIFIER: &str = "Duplicate identifier '{0}'.";
    pub const EXPECTED_ARGUMENTS: &str = "Expected {0} arguments, but got {1}.";
    pub const ARGUMENT_NOT_ASSIGNABLE: &str =
        "Argument of type '{0}' is not assignable to parameter of type '{1}'.";
    pub const TYPE_ARGUMENT_CONSTRAINT: &str =
        "Type '{0}' does not satisfy the constraint '{1}'.";
    pub const PROPERTY_DOES_NOT_EXIST: &str = "Property '{0}' does not exist on type '{1}'.";
    pub const INVALID_INDEX_TYPE: &str = "Type '{0}' cannot be used as an index type.";
    pub const NOT_CALLABLE: &str = "Type '{0}' is not callable.";
    pub const EXPRESSION_TOO_DEEP: &str =
        "Expression is nested too deeply (limit {0}) and cannot be analyzed.";
    pub const INTERNAL_ERROR: &str = "Internal checker error: {0}";
}

/// Look up the message template for a diagnostic code.
pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_FIND_NAME,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CANNOT_FIND_NAME,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_FIND_TYPE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CANNOT_FIND_TYPE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_IDENTIFIER,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::DUPLICATE_IDENTIFIER,
    },
    DiagnosticMessage {
        code: diagnostic_codes::EXPECTED_ARGUMENTS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::EXPECTED_ARGUMENTS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ARGUMENT_NOT_ASSIGNABLE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::ARGUMENT_NOT_ASSIGNABLE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_ARGUMENT_CONSTRAINT,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::TYPE_ARGUMENT_CONSTRAINT,
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROPERTY_DOES_NOT_EXIST,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::PROPERTY_DOES_NOT_EXIST,
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_INDEX_TYPE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::INVALID_INDEX_TYPE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NOT_CALLABLE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::NOT_CALLABLE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::EXPRESSION_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::EXPRESSION_TOO_DEEP,
    },
    DiagnosticMessage {
        code: diagnostic_codes::INTERNAL_ERROR,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::INTERNAL_ERROR,
    },
];

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    /// Build an error from a code's registered template.
    pub fn from_code(
        file: impl Into<String>,
        start: u32,
        length: u32,
        code: u32,
        args: &[&str],
    ) -> Self {
        let template = get_message_template(code).unwrap_or("{0}");
        Self::error(file, start, length, format_message(template, args), code)
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
