use super::{or_default, Attributes, Discriminator, Entity, Post, TaxonomyEntity, Term, TermMeta};
use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::query::SelectQuery;
use crate::relation::eager::distinct_keys;
use crate::relation::{load_belongs_to, Pivot, RelationDef};
use crate::row::{ColumnValue, FromRow, Row};
use serde::Serialize;
use std::ops::Deref;

columns!(
    /// Columns of `{prefix}term_taxonomy`
    TaxonomyColumn {
        TermTaxonomyId => "term_taxonomy_id",
        TermId => "term_id",
        Taxonomy => "taxonomy",
        Description => "description",
        Parent => "parent",
        Count => "count",
    }
);

/// A row of the term_taxonomy table: a [`Term`] used in one taxonomy
///
/// The linked term is always loaded with the taxonomy (unless the query was
/// built with `without_relations`), and attribute reads fall through to it:
///
/// ```no_run
/// use lifepress::{Attributes, Category, Connection, Entity, SqliteExecutor, TablePrefix};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
/// for category in Category::all(&conn)? {
///     // `slug` lives on the term, not on term_taxonomy
///     println!("{:?}", category.attribute("slug"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Taxonomy {
    pub term_taxonomy_id: i64,
    pub term_id: i64,
    pub taxonomy: String,
    pub description: String,
    pub parent: i64,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
}

impl Taxonomy {
    pub(crate) const META: RelationDef =
        RelationDef::has_many("meta", ("term_taxonomy", "term_id"), ("termmeta", "term_id"));

    pub(crate) const TERM: RelationDef =
        RelationDef::belongs_to("term", ("term_taxonomy", "term_id"), ("terms", "term_id"));

    pub(crate) const PARENT: RelationDef = RelationDef::belongs_to(
        "parent",
        ("term_taxonomy", "parent"),
        ("term_taxonomy", "term_taxonomy_id"),
    );

    pub(crate) const POSTS: RelationDef = RelationDef::belongs_to_many(
        "posts",
        ("term_taxonomy", "term_taxonomy_id"),
        ("posts", "ID"),
        Pivot {
            table: "term_relationships",
            from_col: "term_taxonomy_id",
            to_col: "object_id",
        },
    );

    /// Meta rows of the linked term
    pub fn meta<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, TermMeta, E> {
        Self::META.query_for(conn, self.term_id)
    }

    pub fn term<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, Term, E> {
        Self::TERM.query_for(conn, self.term_id)
    }

    pub fn parent<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, Taxonomy, E> {
        Self::PARENT.query_for(conn, self.parent)
    }

    /// Posts attached to this taxonomy through term_relationships
    pub fn posts<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, Post, E> {
        Self::POSTS.query_for(conn, self.term_taxonomy_id)
    }

    /// Name of the loaded term
    pub fn name(&self) -> Option<&str> {
        self.term.as_ref().map(|term| term.name.as_str())
    }

    /// Slug of the loaded term
    pub fn slug(&self) -> Option<&str> {
        self.term.as_ref().map(|term| term.slug.as_str())
    }

    fn own_attribute(&self, name: &str) -> Option<ColumnValue> {
        let value = match name {
            "term_taxonomy_id" => ColumnValue::Int(self.term_taxonomy_id),
            "term_id" => ColumnValue::Int(self.term_id),
            "taxonomy" => self.taxonomy.as_str().into(),
            "description" => self.description.as_str().into(),
            "parent" => ColumnValue::Int(self.parent),
            "count" => ColumnValue::Int(self.count),
            _ => return None,
        };
        Some(value)
    }
}

/// Load and attach the term of every taxonomy with one query
pub(crate) fn attach_terms<'a, E, I>(conn: &Connection<E>, taxonomies: I) -> Result<(), PressError>
where
    E: PressExecutor,
    I: IntoIterator<Item = &'a mut Taxonomy>,
{
    let mut taxonomies: Vec<&mut Taxonomy> = taxonomies.into_iter().collect();
    let keys = distinct_keys(taxonomies.iter().map(|taxonomy| taxonomy.term_id));
    let terms = load_belongs_to::<Term, E>(&Taxonomy::TERM, conn, &keys)?;

    for taxonomy in taxonomies.iter_mut() {
        taxonomy.term = terms.get(&taxonomy.term_id).cloned();
    }
    Ok(())
}

impl FromRow for Taxonomy {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            term_taxonomy_id: row.get("term_taxonomy_id")?,
            term_id: row.get("term_id")?,
            taxonomy: row.get("taxonomy")?,
            description: or_default(row, "description")?,
            parent: or_default(row, "parent")?,
            count: or_default(row, "count")?,
            term: None,
        })
    }
}

impl Entity for Taxonomy {
    const TABLE: &'static str = "term_taxonomy";
    const PRIMARY_KEY: &'static str = "term_taxonomy_id";
    const NAME: &'static str = "Taxonomy";

    fn id(&self) -> i64 {
        self.term_taxonomy_id
    }

    fn eager_load<E: PressExecutor>(models: &mut [Self], conn: &Connection<E>) -> Result<(), PressError> {
        attach_terms(conn, models.iter_mut())
    }
}

impl TaxonomyEntity for Taxonomy {
    fn as_taxonomy(&self) -> &Taxonomy {
        self
    }
}

impl Attributes for Taxonomy {
    const MODEL: &'static str = "Taxonomy";

    /// Own columns first; a missing or NULL one is read from the loaded term
    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        let own = self.own_attribute(name);
        if own.as_ref().map_or(true, ColumnValue::is_null) {
            let inherited = self
                .term
                .as_ref()
                .and_then(|term| term.attribute(name))
                .filter(|value| !value.is_null());
            if inherited.is_some() {
                return inherited;
            }
        }
        own
    }
}

/// Declare a taxonomy restricted to one `taxonomy` discriminator value
macro_rules! typed_taxonomy {
    ($(#[$meta:meta])* $name:ident => $taxonomy:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub Taxonomy);

        impl $name {
            pub const TAXONOMY: &'static str = $taxonomy;

            pub fn into_inner(self) -> Taxonomy {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Taxonomy;

            fn deref(&self) -> &Taxonomy {
                &self.0
            }
        }

        impl FromRow for $name {
            fn from_row(row: &Row) -> Result<Self, PressError> {
                Taxonomy::from_row(row).map(Self)
            }
        }

        impl Entity for $name {
            const TABLE: &'static str = Taxonomy::TABLE;
            const PRIMARY_KEY: &'static str = Taxonomy::PRIMARY_KEY;
            const NAME: &'static str = stringify!($name);

            fn scope() -> Option<Discriminator> {
                Some(Discriminator {
                    column: "taxonomy",
                    value: $taxonomy,
                })
            }

            fn id(&self) -> i64 {
                self.0.term_taxonomy_id
            }

            fn eager_load<E: PressExecutor>(
                models: &mut [Self],
                conn: &Connection<E>,
            ) -> Result<(), PressError> {
                attach_terms(conn, models.iter_mut().map(|model| &mut model.0))
            }
        }

        impl TaxonomyEntity for $name {
            fn as_taxonomy(&self) -> &Taxonomy {
                &self.0
            }
        }

        impl Attributes for $name {
            const MODEL: &'static str = stringify!($name);

            fn attribute(&self, name: &str) -> Option<ColumnValue> {
                self.0.attribute(name)
            }
        }
    };
}

typed_taxonomy!(
    /// Taxonomy rows with `taxonomy = 'category'`
    Category => "category"
);

typed_taxonomy!(
    /// Taxonomy rows with `taxonomy = 'post_tag'`
    Tag => "post_tag"
);
