//! Violation Definition Macro
//!
//! Declarative macro for defining violation enums with automatic trait
//! implementations.
//!
//! # Example
//!
//! ```ignore
//! define_violations! {
//!     ViolationCategory::Mutability,
//!     pub enum MutabilityViolation {
//!         #[violation(
//!             id = "NTX4",
//!             severity = Style,
//!             message = "Function '{function}' reads contract state but is not marked as 'view'.",
//!             suggestion = "Add @view to '{function}'"
//!         )]
//!         ImplicitView {
//!             function: String,
//!             file: PathBuf,
//!             line: usize,
//!             column: usize,
//!         },
//!     }
//! }
//! ```

/// Macro to define violation enums with automatic trait implementations
///
/// This macro generates:
/// - The enum with all variants
/// - `Display` implementation with formatted messages
/// - `Violation` trait implementation
///
/// Every variant must carry `file: PathBuf`, `line: usize` and
/// `column: usize`. Message and suggestion templates capture variant fields
/// by name (`{function}`).
#[macro_export]
macro_rules! define_violations {
    (
        $category:expr,
        $vis:vis enum $name:ident {
            $(
                #[violation(
                    id = $id:literal,
                    severity = $severity:ident,
                    message = $msg:literal
                    $(, suggestion = $suggestion:literal)?
                )]
                $variant:ident {
                    $( $field:ident : $field_ty:ty ),* $(,)?
                }
            ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
        $vis enum $name {
            $( $variant { $( $field: $field_ty ),* } ),*
        }

        impl std::fmt::Display for $name {
            #[allow(unused_variables)]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant { $( $field ),* } => write!(f, $msg),
                    )*
                }
            }
        }

        impl $crate::violation_trait::Violation for $name {
            fn id(&self) -> &str {
                match self {
                    $( Self::$variant { .. } => $id ),*
                }
            }

            fn category(&self) -> $crate::violation_trait::ViolationCategory {
                $category
            }

            fn severity(&self) -> $crate::violation_trait::Severity {
                match self {
                    $( Self::$variant { .. } => $crate::violation_trait::Severity::$severity ),*
                }
            }

            fn file(&self) -> &std::path::PathBuf {
                match self {
                    $( Self::$variant { file, .. } => file ),*
                }
            }

            fn line(&self) -> usize {
                match self {
                    $( Self::$variant { line, .. } => *line ),*
                }
            }

            fn column(&self) -> usize {
                match self {
                    $( Self::$variant { column, .. } => *column ),*
                }
            }

            #[allow(unused_variables)]
            fn suggestion(&self) -> Option<String> {
                match self {
                    $(
                        Self::$variant { $( $field ),* } => {
                            $crate::define_violations!(@suggestion $($suggestion)?)
                        }
                    ),*
                }
            }
        }
    };

    (@suggestion $suggestion:literal) => {
        Some(format!($suggestion))
    };

    (@suggestion) => {
        None
    };
}
