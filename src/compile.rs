//! End-to-end compilation from a stored segment filter to SQL.
//!
//! ```text
//! filter JSON → RawSegmentFilter → SegmentFilter → UnionQueryContainer → SQL + params
//! ```
//!
//! # Example
//!
//! ```ignore
//! use custom_objects::compile::{compile_filter_json, CompileOptions};
//! use custom_objects::metadata::{Catalog, FieldTypeRegistry};
//!
//! let catalog = Catalog::from_file("catalog.toml", FieldTypeRegistry::default())?;
//! let json = r#"{"field":"cmf_10","object":"custom_object","operator":"gt","filter":100}"#;
//!
//! let output = compile_filter_json(json, &catalog, &CompileOptions::default())?;
//! println!("{}", output.sql);
//! ```

use crate::config::{Settings, SettingsError};
use crate::metadata::FieldMetadataProvider;
use crate::query::{AliasScope, CustomFieldQueryCompiler, DepthLimit, QueryError};
use crate::segment::{ContactRestriction, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher};
use crate::sql::{Dialect, Parameters, Query};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub dialect: Dialect,
    pub depth: DepthLimit,
    pub alias_scope: AliasScope,
    pub alias_seed: String,
    pub restriction: ContactRestriction,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            depth: DepthLimit::default(),
            alias_scope: AliasScope::default(),
            alias_seed: "filter_0".to_string(),
            restriction: ContactRestriction::AllContacts,
        }
    }
}

impl CompileOptions {
    /// Options matching a loaded configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            dialect: settings.sql.dialect,
            depth: settings.custom_objects.depth_limit()?,
            alias_scope: settings.sql.alias_scope,
            ..Self::default()
        })
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_depth(mut self, depth: DepthLimit) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_alias_scope(mut self, scope: AliasScope) -> Self {
        self.alias_scope = scope;
        self
    }

    pub fn with_alias_seed(mut self, seed: &str) -> Self {
        self.alias_seed = seed.to_string();
        self
    }

    /// Restrict every fragment to one contact.
    pub fn for_contact(mut self, contact_id: i64) -> Self {
        self.restriction = ContactRestriction::Contact(contact_id);
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of compiling one filter.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The `UNION ALL` statement.
    pub sql: String,

    /// Named parameters the statement binds.
    pub params: Parameters,

    /// The statement AST, for splicing into a larger query.
    pub query: Query,

    pub dialect: Dialect,

    /// Number of relationship-path fragments.
    pub fragments: usize,

    /// The statement lists contacts to exclude rather than include.
    pub negated: bool,
}

// ============================================================================
// Public API
// ============================================================================

/// Compile a filter record given as JSON.
pub fn compile_filter_json(
    json: &str,
    provider: &dyn FieldMetadataProvider,
    options: &CompileOptions,
) -> CompileResult<CompileOutput> {
    let raw: RawSegmentFilter = serde_json::from_str(json)?;
    compile_filter(&raw, provider, options)
}

/// Compile a custom object filter to its `UNION ALL` statement.
///
/// Platform filters fail with `InvalidSegmentFilter`.
pub fn compile_filter(
    raw: &RawSegmentFilter,
    provider: &dyn FieldMetadataProvider,
    options: &CompileOptions,
) -> CompileResult<CompileOutput> {
    let filter = SegmentFilter::try_from(raw)?;
    let compiler =
        CustomFieldQueryCompiler::new(provider, options.depth).with_alias_scope(options.alias_scope);
    let dispatcher = SegmentFilterDispatcher::new(compiler);

    let container = dispatcher.build(&filter, &options.alias_seed, options.restriction)?;
    let query = container.to_query();

    Ok(CompileOutput {
        sql: query.to_sql(options.dialect),
        params: container.parameters(),
        query,
        dialect: options.dialect,
        fragments: container.count(),
        negated: filter.is_negative(),
    })
}
