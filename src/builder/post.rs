//! Query extensions for post-like entities.

use crate::executor::PressExecutor;
use crate::model::{
    PostColumn, PostEntity, PostMetaColumn, RelationshipColumn, TaxonomyColumn, TermColumn,
};
use crate::query::{Ident, SelectQuery, SortOrder};
use chrono::NaiveDateTime;
use sea_query::{
    Asterisk, Condition, Expr, ExprTrait, Func, Order, Query, QueryStatementBuilder, Value, Values,
};

/// Term slugs for [`PostBuilder::taxonomy`]: one slug or a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<String>);

impl Terms {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Terms {
    fn from(slug: &str) -> Self {
        Self(vec![slug.to_string()])
    }
}

impl From<String> for Terms {
    fn from(slug: String) -> Self {
        Self(vec![slug])
    }
}

impl From<Vec<String>> for Terms {
    fn from(slugs: Vec<String>) -> Self {
        Self(slugs)
    }
}

impl From<Vec<&str>> for Terms {
    fn from(slugs: Vec<&str>) -> Self {
        Self(slugs.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Terms {
    fn from(slugs: &[&str]) -> Self {
        Self(slugs.iter().map(|slug| (*slug).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Terms {
    fn from(slugs: [&str; N]) -> Self {
        Self(slugs.iter().map(|slug| (*slug).to_string()).collect())
    }
}

/// Input of [`PostBuilder::search`]
///
/// A phrase is split on whitespace; a list is taken token by token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Search {
    Phrase(String),
    Tokens(Vec<String>),
}

impl Search {
    /// Normalized tokens: `%` removed, trimmed, empty ones dropped
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Search::Phrase(phrase) => phrase.split_whitespace().collect(),
            Search::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(|token| token.replace('%', "").trim().to_string())
            .filter(|token| !token.is_empty())
            .collect()
    }
}

impl From<&str> for Search {
    fn from(phrase: &str) -> Self {
        Search::Phrase(phrase.to_string())
    }
}

impl From<String> for Search {
    fn from(phrase: String) -> Self {
        Search::Phrase(phrase)
    }
}

impl From<Vec<String>> for Search {
    fn from(tokens: Vec<String>) -> Self {
        Search::Tokens(tokens)
    }
}

impl From<Vec<&str>> for Search {
    fn from(tokens: Vec<&str>) -> Self {
        Search::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Search {
    fn from(tokens: [&str; N]) -> Self {
        Search::Tokens(tokens.iter().map(|token| (*token).to_string()).collect())
    }
}

/// Fluent filters for post-like entities ([`Post`](crate::Post), [`MenuItem`](crate::MenuItem))
///
/// Every method ANDs its predicate into the query. Multi-branch predicates are
/// added as one parenthesised group, so they compose with sibling filters.
///
/// # Example
///
/// ```no_run
/// use lifepress::{Connection, Entity, Post, PostBuilder, SortOrder, SqliteExecutor, TablePrefix};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
/// let posts = Post::query(&conn)
///     .published()
///     .type_("post")
///     .taxonomy("category", ["news", "events"])
///     .search("rust orm")
///     .order_by_meta("rank", SortOrder::Asc)
///     .all()?;
/// # Ok(())
/// # }
/// ```
pub trait PostBuilder: Sized {
    /// `post_status = status`
    fn status(self, status: &str) -> Self;

    /// Published now: `publish`, or `future` with a `post_date` already passed
    fn published(self) -> Self;

    /// Published at `now`, for callers that control the clock
    fn published_at(self, now: NaiveDateTime) -> Self;

    /// `post_type = post_type`
    fn type_(self, post_type: &str) -> Self;

    /// `post_type IN (...)`; an empty list matches nothing
    fn type_in<I, S>(self, post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    /// `post_name = slug`
    fn slug(self, slug: &str) -> Self;

    /// `post_parent = id`
    fn parent(self, id: i64) -> Self;

    /// Attached to a `taxonomy` whose term slug is one of `terms`
    fn taxonomy<T: Into<Terms>>(self, taxonomy: &str, terms: T) -> Self;

    /// Case-insensitive match of any token in title, excerpt or content
    ///
    /// A no-op when normalization leaves no token.
    fn search<S: Into<Search>>(self, search: S) -> Self;

    /// Order by the value of one meta key, shorter values first
    ///
    /// The value is projected as `meta_ordering`. Sorting is by its length
    /// ascending, then by the value itself in `order`, which puts numeric
    /// strings in numeric order.
    fn order_by_meta(self, key: &str, order: SortOrder) -> Self;

    /// Only the given ids, returned in the given order; none matches nothing
    fn where_ids<I: IntoIterator<Item = i64>>(self, ids: I) -> Self;

    #[deprecated(note = "use `where_ids`")]
    fn ids<I: IntoIterator<Item = i64>>(self, ids: I) -> Self {
        self.where_ids(ids)
    }
}

impl<'c, M, E> PostBuilder for SelectQuery<'c, M, E>
where
    M: PostEntity,
    E: PressExecutor,
{
    fn status(self, status: &str) -> Self {
        let column = self.col(PostColumn::PostStatus);
        self.filter(Expr::col(column).eq(status))
    }

    fn published(self) -> Self {
        self.published_at(chrono::Local::now().naive_local())
    }

    fn published_at(self, now: NaiveDateTime) -> Self {
        let status = self.col(PostColumn::PostStatus);
        let date = self.col(PostColumn::PostDate);
        self.filter(
            Condition::any()
                .add(Expr::col(status.clone()).eq("publish"))
                .add(
                    Condition::all()
                        .add(Expr::col(status).eq("future"))
                        .add(Expr::col(date).lte(Value::from(now))),
                ),
        )
    }

    fn type_(self, post_type: &str) -> Self {
        let column = self.col(PostColumn::PostType);
        self.filter(Expr::col(column).eq(post_type))
    }

    fn type_in<I, S>(self, post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.where_in(
            PostColumn::PostType,
            post_types.into_iter().map(Into::<String>::into),
        )
    }

    fn slug(self, slug: &str) -> Self {
        let column = self.col(PostColumn::PostName);
        self.filter(Expr::col(column).eq(slug))
    }

    fn parent(self, id: i64) -> Self {
        let column = self.col(PostColumn::PostParent);
        self.filter(Expr::col(column).eq(id))
    }

    fn taxonomy<T: Into<Terms>>(self, taxonomy: &str, terms: T) -> Self {
        let terms: Terms = terms.into();
        let conn = self.connection();
        let term_taxonomy = Ident::new(conn.table("term_taxonomy"));
        let relationships = Ident::new(conn.table("term_relationships"));
        let term_table = Ident::new(conn.table("terms"));

        let mut term_match = Query::select();
        term_match
            .column((term_table.clone(), Asterisk))
            .from(term_table.clone())
            .and_where(
                Expr::col((term_table.clone(), TermColumn::TermId))
                    .equals((term_taxonomy.clone(), TaxonomyColumn::TermId)),
            );
        if terms.as_slice().is_empty() {
            term_match.and_where(Expr::cust("1 = 0"));
        } else {
            term_match.and_where(
                Expr::col((term_table, TermColumn::Slug)).is_in(terms.as_slice().iter().cloned()),
            );
        }

        let mut attached = Query::select();
        attached
            .column((term_taxonomy.clone(), Asterisk))
            .from(term_taxonomy.clone())
            .inner_join(
                relationships.clone(),
                Expr::col((relationships.clone(), RelationshipColumn::TermTaxonomyId))
                    .equals((term_taxonomy.clone(), TaxonomyColumn::TermTaxonomyId)),
            )
            .and_where(
                Expr::col((relationships, RelationshipColumn::ObjectId))
                    .equals(self.col(PostColumn::Id)),
            )
            .and_where(Expr::col((term_taxonomy, TaxonomyColumn::Taxonomy)).eq(taxonomy))
            .and_where(Expr::exists(term_match));

        self.where_has(attached)
    }

    fn search<S: Into<Search>>(self, search: S) -> Self {
        let tokens = search.into().tokens();
        if tokens.is_empty() {
            return self;
        }

        let columns = [
            PostColumn::PostTitle,
            PostColumn::PostExcerpt,
            PostColumn::PostContent,
        ];
        let mut any = Condition::any();
        for token in tokens {
            let pattern = format!("%{}%", token.to_lowercase());
            for column in columns {
                any = any.add(
                    Expr::from(Func::lower(Expr::col(self.col(column)))).like(pattern.as_str()),
                );
            }
        }
        self.filter(any)
    }

    fn order_by_meta(self, key: &str, order: SortOrder) -> Self {
        let posts = self.table().clone();
        let meta = Ident::new(self.connection().table("postmeta"));

        let mut value = Query::select();
        value
            .column((meta.clone(), PostMetaColumn::MetaValue))
            .from(meta.clone())
            .and_where(Expr::col((meta.clone(), PostMetaColumn::MetaKey)).eq(key))
            .and_where(
                Expr::col((posts, PostColumn::Id)).equals((meta, PostMetaColumn::PostId)),
            )
            .limit(1);
        let value = Expr::SubQuery(None, Box::new(value.into_sub_query_statement()));

        // Ordering repeats the expression: Postgres rejects an output alias inside LENGTH()
        self.select_expr_as(value.clone(), Ident::from_static("meta_ordering"))
            .order_by_expr(
                Expr::from(Func::cust(Ident::from_static("LENGTH")).arg(value.clone())),
                Order::Asc,
            )
            .order_by_expr(value, order.into())
    }

    fn where_ids<I: IntoIterator<Item = i64>>(self, ids: I) -> Self {
        let ids: Vec<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            return self.filter(Expr::cust("1 = 0"));
        }

        let id = self.col(PostColumn::Id);
        let positions = Values(ids.iter().copied().map(Value::from).collect());
        self.filter(Expr::col(id.clone()).is_in(ids))
            .order_by(id, Order::Field(positions))
    }
}
