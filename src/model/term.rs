use super::{or_default, Attributes, Entity};
use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::query::SelectQuery;
use crate::relation::RelationDef;
use crate::row::{ColumnValue, FromRow, Row};
use serde::Serialize;

columns!(
    /// Columns of `{prefix}terms`
    TermColumn {
        TermId => "term_id",
        Name => "name",
        Slug => "slug",
        TermGroup => "term_group",
    }
);

columns!(
    /// Columns of `{prefix}termmeta`
    TermMetaColumn {
        MetaId => "meta_id",
        TermId => "term_id",
        MetaKey => "meta_key",
        MetaValue => "meta_value",
    }
);

columns!(
    /// Columns of the `{prefix}term_relationships` pivot
    RelationshipColumn {
        ObjectId => "object_id",
        TermTaxonomyId => "term_taxonomy_id",
        TermOrder => "term_order",
    }
);

/// A row of the terms table: the named value, independent of its taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub term_id: i64,
    pub name: String,
    pub slug: String,
    pub term_group: i64,
}

impl Term {
    pub(crate) const META: RelationDef =
        RelationDef::has_many("meta", ("terms", "term_id"), ("termmeta", "term_id"));

    pub fn meta<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, TermMeta, E> {
        Self::META.query_for(conn, self.term_id)
    }
}

impl FromRow for Term {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            term_id: row.get("term_id")?,
            name: row.get("name")?,
            slug: row.get("slug")?,
            term_group: or_default(row, "term_group")?,
        })
    }
}

impl Entity for Term {
    const TABLE: &'static str = "terms";
    const PRIMARY_KEY: &'static str = "term_id";
    const NAME: &'static str = "Term";

    fn id(&self) -> i64 {
        self.term_id
    }
}

impl Attributes for Term {
    const MODEL: &'static str = "Term";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        let value = match name {
            "term_id" => ColumnValue::Int(self.term_id),
            "name" => self.name.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "term_group" => ColumnValue::Int(self.term_group),
            _ => return None,
        };
        Some(value)
    }
}

/// A row of the termmeta table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermMeta {
    pub meta_id: i64,
    pub term_id: i64,
    pub meta_key: String,
    pub meta_value: Option<String>,
}

impl FromRow for TermMeta {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            meta_id: row.get("meta_id")?,
            term_id: row.get("term_id")?,
            meta_key: row.get("meta_key")?,
            meta_value: row.get_opt("meta_value")?,
        })
    }
}

impl Entity for TermMeta {
    const TABLE: &'static str = "termmeta";
    const PRIMARY_KEY: &'static str = "meta_id";
    const NAME: &'static str = "TermMeta";

    fn id(&self) -> i64 {
        self.meta_id
    }
}

impl Attributes for TermMeta {
    const MODEL: &'static str = "TermMeta";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        let value = match name {
            "meta_id" => ColumnValue::Int(self.meta_id),
            "term_id" => ColumnValue::Int(self.term_id),
            "meta_key" => self.meta_key.as_str().into(),
            "meta_value" => self.meta_value.clone().into(),
            _ => return None,
        };
        Some(value)
    }
}
