//! Ordered collection of fragments rendered as one `UNION ALL` statement.

use crate::sql::{Dialect, Parameters, Query, SetOperation};

use super::fragment::Fragment;

/// Fragments of one filter, in the order the paths were enumerated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionQueryContainer {
    fragments: Vec<Fragment>,
}

impl UnionQueryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn count(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Mutable access, for callers adding the same restriction to every fragment.
    pub fn fragments_mut(&mut self) -> impl Iterator<Item = &mut Fragment> {
        self.fragments.iter_mut()
    }

    /// Parameters of every fragment.
    pub fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        for fragment in &self.fragments {
            params.merge(&fragment.params);
        }
        params
    }

    /// The fragments chained with `UNION ALL`.
    ///
    /// # Panics
    ///
    /// Panics if the container is empty. A compiled filter always has at
    /// least the direct path.
    pub fn to_query(&self) -> Query {
        assert!(!self.is_empty(), "rendering an empty UnionQueryContainer");

        let mut queries = self.fragments.iter().map(|f| f.query.clone());
        let first = queries.next().unwrap_or_default();
        let Some(second) = queries.next() else {
            return first;
        };

        let chained = queries.fold(SetOperation::union_all(first, second), |acc, next| {
            acc.chain(next)
        });
        chained.into()
    }

    /// SQL text and merged parameters.
    ///
    /// # Panics
    ///
    /// Panics if the container is empty.
    pub fn render(&self, dialect: Dialect) -> (String, Parameters) {
        (self.to_query().to_sql(dialect), self.parameters())
    }
}

impl IntoIterator for UnionQueryContainer {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}
