//! Routes segment filters and splices compiled unions into the contact query.

use tracing::debug;

use crate::model::ContactId;
use crate::query::{CustomFieldQueryCompiler, QueryError, QueryResult, UnionQueryContainer};
use crate::sql::{table_col, Dialect, Expr, ExprExt, Parameters, Query, TableRef};

use super::filter::{Glue, RawSegmentFilter, SegmentFilter};

/// Which contacts a compiled filter is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRestriction {
    /// Every contact; used when rebuilding a segment.
    AllContacts,
    /// One contact; used by per-contact evaluators.
    Contact(ContactId),
}

/// The enclosing contact query that filters are attached to.
///
/// Conditions are grouped the way the platform groups segment filters:
/// `and` extends the current group, `or` starts a new one, and the groups
/// are ORed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentQuery {
    pub query: Query,
    pub params: Parameters,
    groups: Vec<Vec<Expr>>,
}

impl SegmentQuery {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            params: Parameters::new(),
            groups: Vec::new(),
        }
    }

    /// Attach a condition with the given glue.
    pub fn add_condition(&mut self, glue: Glue, condition: Expr) {
        match (glue, self.groups.last_mut()) {
            (Glue::And, Some(group)) => group.push(condition),
            _ => self.groups.push(vec![condition]),
        }
    }

    /// Number of conditions attached so far.
    pub fn condition_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// The base query with the attached conditions in its WHERE clause.
    pub fn to_query(&self) -> Query {
        let mut query = self.query.clone();
        let combined = self
            .groups
            .iter()
            .filter_map(|group| group.iter().cloned().reduce(|acc, next| acc.and(next)))
            .reduce(|acc, next| acc.or(next));
        if let Some(condition) = combined {
            query.add_filter(condition);
        }
        query
    }

    pub fn render(&self, dialect: Dialect) -> (String, Parameters) {
        (self.to_query().to_sql(dialect), self.params.clone())
    }
}

/// Applies filters the custom object compiler does not own.
pub trait NativeFilterHandler: Send + Sync {
    fn apply(
        &self,
        filter: &RawSegmentFilter,
        outer: &mut SegmentQuery,
        contact_alias: &str,
    ) -> QueryResult<()>;
}

/// Sends each filter to the compiler that understands it.
pub struct SegmentFilterDispatcher<'a> {
    compiler: CustomFieldQueryCompiler<'a>,
    native: Option<&'a dyn NativeFilterHandler>,
}

impl<'a> SegmentFilterDispatcher<'a> {
    pub fn new(compiler: CustomFieldQueryCompiler<'a>) -> Self {
        Self {
            compiler,
            native: None,
        }
    }

    pub fn with_native_handler(mut self, handler: &'a dyn NativeFilterHandler) -> Self {
        self.native = Some(handler);
        self
    }

    pub fn compiler(&self) -> &CustomFieldQueryCompiler<'a> {
        &self.compiler
    }

    /// Compile a custom object filter into its union of fragments.
    ///
    /// Native filters are not ours and fail with `InvalidSegmentFilter`.
    pub fn build(
        &self,
        filter: &SegmentFilter,
        alias_seed: &str,
        restriction: ContactRestriction,
    ) -> QueryResult<UnionQueryContainer> {
        let mut container = match filter {
            SegmentFilter::CustomField { filter, .. } => self.compiler.compile(filter, alias_seed)?,
            SegmentFilter::CustomItem { filter, .. } => {
                self.compiler.compile_object_items(filter, alias_seed)?
            }
            SegmentFilter::Native(raw) => {
                return Err(QueryError::invalid(format!(
                    "'{}' on '{}' is handled by the platform",
                    raw.field, raw.object
                )))
            }
        };

        if let ContactRestriction::Contact(contact_id) = restriction {
            for fragment in container.fragments_mut() {
                fragment.restrict_to_contact(contact_id);
            }
        }

        Ok(container)
    }

    /// Attach `filter` to `outer` as a correlated contact-id predicate.
    ///
    /// Renders `<contact_alias>.id IN (SELECT <seed>_union.contact_id FROM
    /// (<union>) <seed>_union)`, with `NOT IN` for negative operators.
    pub fn apply(
        &self,
        filter: &SegmentFilter,
        outer: &mut SegmentQuery,
        contact_alias: &str,
        alias_seed: &str,
        restriction: ContactRestriction,
    ) -> QueryResult<()> {
        if let SegmentFilter::Native(raw) = filter {
            return match self.native {
                Some(handler) => handler.apply(raw, outer, contact_alias),
                None => Err(QueryError::invalid(format!(
                    "no handler for platform filter '{}'",
                    raw.field
                ))),
            };
        }

        let container = self.build(filter, alias_seed, restriction)?;
        let union_alias = format!("{}_union", alias_seed);
        let matching = Query::new()
            .select(vec![table_col(&union_alias, "contact_id")])
            .from(TableRef::subquery(container.to_query(), &union_alias));

        let contact_id = table_col(contact_alias, "id");
        let predicate = if filter.is_negative() {
            contact_id.not_in_subquery(matching)
        } else {
            contact_id.in_subquery(matching)
        };

        outer.add_condition(filter.glue(), predicate);
        outer.params.merge(&container.parameters());

        debug!(
            alias = alias_seed,
            fragments = container.count(),
            negated = filter.is_negative(),
            "attached custom object filter"
        );
        Ok(())
    }
}
