use super::{or_default, wp_datetime, Attributes, Entity, PostEntity, Taxonomy};
use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::query::SelectQuery;
use crate::relation::{Pivot, RelationDef};
use crate::row::{ColumnValue, FromRow, Row};
use chrono::NaiveDateTime;
use sea_query::{Expr, ExprTrait};
use serde::Serialize;

columns!(
    /// Columns of `{prefix}posts`
    PostColumn {
        Id => "ID",
        PostAuthor => "post_author",
        PostDate => "post_date",
        PostDateGmt => "post_date_gmt",
        PostContent => "post_content",
        PostTitle => "post_title",
        PostExcerpt => "post_excerpt",
        PostStatus => "post_status",
        CommentStatus => "comment_status",
        PostName => "post_name",
        PostModified => "post_modified",
        PostParent => "post_parent",
        Guid => "guid",
        MenuOrder => "menu_order",
        PostType => "post_type",
        PostMimeType => "post_mime_type",
        CommentCount => "comment_count",
    }
);

columns!(
    /// Columns of `{prefix}postmeta`
    PostMetaColumn {
        MetaId => "meta_id",
        PostId => "post_id",
        MetaKey => "meta_key",
        MetaValue => "meta_value",
    }
);

/// Alias of the value projected by `order_by_meta`
pub(crate) const META_ORDERING: &str = "meta_ordering";

/// A row of the posts table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: i64,
    pub post_author: i64,
    pub post_date: Option<NaiveDateTime>,
    pub post_date_gmt: Option<NaiveDateTime>,
    pub post_content: String,
    pub post_title: String,
    pub post_excerpt: String,
    pub post_status: String,
    pub comment_status: String,
    pub post_name: String,
    pub post_modified: Option<NaiveDateTime>,
    pub post_parent: i64,
    pub guid: String,
    pub menu_order: i64,
    pub post_type: String,
    pub post_mime_type: String,
    pub comment_count: i64,
    /// Meta value projected by `order_by_meta`, when that ordering was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_ordering: Option<String>,
}

impl Post {
    pub(crate) const META: RelationDef =
        RelationDef::has_many("meta", ("posts", "ID"), ("postmeta", "post_id"));

    pub(crate) const TAXONOMIES: RelationDef = RelationDef::belongs_to_many(
        "taxonomies",
        ("posts", "ID"),
        ("term_taxonomy", "term_taxonomy_id"),
        Pivot {
            table: "term_relationships",
            from_col: "object_id",
            to_col: "term_taxonomy_id",
        },
    );

    pub(crate) const PARENT: RelationDef =
        RelationDef::belongs_to("parent", ("posts", "post_parent"), ("posts", "ID"));

    pub(crate) const CHILDREN: RelationDef =
        RelationDef::has_many("children", ("posts", "ID"), ("posts", "post_parent"));

    /// Meta rows of this post
    pub fn meta<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, PostMeta, E> {
        Self::META.query_for(conn, self.id)
    }

    /// Value of one meta key, if set
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the query fails.
    pub fn meta_value<E: PressExecutor>(
        &self,
        conn: &Connection<E>,
        key: &str,
    ) -> Result<Option<String>, PressError> {
        let query = self.meta(conn);
        let meta_key = query.col(PostMetaColumn::MetaKey);
        let found = query.filter(Expr::col(meta_key).eq(key)).first()?;
        Ok(found.and_then(|meta| meta.meta_value))
    }

    /// Taxonomies (categories, tags, menus, ...) this post is attached to
    pub fn taxonomies<'c, E: PressExecutor>(
        &self,
        conn: &'c Connection<E>,
    ) -> SelectQuery<'c, Taxonomy, E> {
        Self::TAXONOMIES.query_for(conn, self.id)
    }

    pub fn parent<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, Post, E> {
        Self::PARENT.query_for(conn, self.post_parent)
    }

    pub fn children<'c, E: PressExecutor>(
        &self,
        conn: &'c Connection<E>,
    ) -> SelectQuery<'c, Post, E> {
        Self::CHILDREN.query_for(conn, self.id)
    }

    /// Whether the post is visible to readers at `now`
    pub fn is_published_at(&self, now: NaiveDateTime) -> bool {
        match self.post_status.as_str() {
            "publish" => true,
            "future" => self.post_date.is_some_and(|date| date <= now),
            _ => false,
        }
    }
}

impl FromRow for Post {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            id: row.get("ID")?,
            post_author: or_default(row, "post_author")?,
            post_date: wp_datetime(row, "post_date")?,
            post_date_gmt: wp_datetime(row, "post_date_gmt")?,
            post_content: or_default(row, "post_content")?,
            post_title: row.get("post_title")?,
            post_excerpt: or_default(row, "post_excerpt")?,
            post_status: row.get("post_status")?,
            comment_status: or_default(row, "comment_status")?,
            post_name: or_default(row, "post_name")?,
            post_modified: wp_datetime(row, "post_modified")?,
            post_parent: or_default(row, "post_parent")?,
            guid: or_default(row, "guid")?,
            menu_order: or_default(row, "menu_order")?,
            post_type: row.get("post_type")?,
            post_mime_type: or_default(row, "post_mime_type")?,
            comment_count: or_default(row, "comment_count")?,
            meta_ordering: row.get_opt(META_ORDERING)?,
        })
    }
}

impl Entity for Post {
    const TABLE: &'static str = "posts";
    const PRIMARY_KEY: &'static str = "ID";
    const NAME: &'static str = "Post";

    fn id(&self) -> i64 {
        self.id
    }
}

impl PostEntity for Post {}

impl Attributes for Post {
    const MODEL: &'static str = "Post";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        let value = match name {
            "ID" | "id" => ColumnValue::Int(self.id),
            "post_author" => ColumnValue::Int(self.post_author),
            "post_date" => self.post_date.into(),
            "post_date_gmt" => self.post_date_gmt.into(),
            "post_content" => self.post_content.as_str().into(),
            "post_title" => self.post_title.as_str().into(),
            "post_excerpt" => self.post_excerpt.as_str().into(),
            "post_status" => self.post_status.as_str().into(),
            "comment_status" => self.comment_status.as_str().into(),
            "post_name" => self.post_name.as_str().into(),
            "post_modified" => self.post_modified.into(),
            "post_parent" => ColumnValue::Int(self.post_parent),
            "guid" => self.guid.as_str().into(),
            "menu_order" => ColumnValue::Int(self.menu_order),
            "post_type" => self.post_type.as_str().into(),
            "post_mime_type" => self.post_mime_type.as_str().into(),
            "comment_count" => ColumnValue::Int(self.comment_count),
            META_ORDERING => self.meta_ordering.clone().into(),
            _ => return None,
        };
        Some(value)
    }
}

/// A row of the postmeta table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMeta {
    pub meta_id: i64,
    pub post_id: i64,
    pub meta_key: String,
    pub meta_value: Option<String>,
}

impl PostMeta {
    pub(crate) const POST: RelationDef =
        RelationDef::belongs_to("post", ("postmeta", "post_id"), ("posts", "ID"));

    /// The post owning this meta row
    pub fn post<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, Post, E> {
        Self::POST.query_for(conn, self.post_id)
    }
}

impl FromRow for PostMeta {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            meta_id: row.get("meta_id")?,
            post_id: row.get("post_id")?,
            meta_key: row.get("meta_key")?,
            meta_value: row.get_opt("meta_value")?,
        })
    }
}

impl Entity for PostMeta {
    const TABLE: &'static str = "postmeta";
    const PRIMARY_KEY: &'static str = "meta_id";
    const NAME: &'static str = "PostMeta";

    fn id(&self) -> i64 {
        self.meta_id
    }
}

impl Attributes for PostMeta {
    const MODEL: &'static str = "PostMeta";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        let value = match name {
            "meta_id" => ColumnValue::Int(self.meta_id),
            "post_id" => ColumnValue::Int(self.post_id),
            "meta_key" => self.meta_key.as_str().into(),
            "meta_value" => self.meta_value.clone().into(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row() -> Row {
        Row::new(vec![
            ("ID".to_string(), ColumnValue::Int(12)),
            ("post_title".to_string(), ColumnValue::Text("Hello world".into())),
            ("post_status".to_string(), ColumnValue::Text("future".into())),
            ("post_type".to_string(), ColumnValue::Text("post".into())),
            ("post_date".to_string(), ColumnValue::Text("2030-01-01 00:00:00".into())),
            ("post_excerpt".to_string(), ColumnValue::Null),
        ])
    }

    #[test]
    fn test_from_row_tolerates_missing_optional_columns() {
        let post = Post::from_row(&row()).unwrap();
        assert_eq!(post.id, 12);
        assert_eq!(post.post_excerpt, "");
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.meta_ordering, None);
    }

    #[test]
    fn test_from_row_requires_identity_columns() {
        let row = Row::new(vec![("ID".to_string(), ColumnValue::Int(1))]);
        assert!(Post::from_row(&row).is_err());
    }

    #[test]
    fn test_is_published_at() {
        let post = Post::from_row(&row()).unwrap();
        let before = NaiveDate::from_ymd_opt(2029, 12, 31)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let after = NaiveDate::from_ymd_opt(2030, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert!(!post.is_published_at(before));
        assert!(post.is_published_at(after));
    }

    #[test]
    fn test_attributes() {
        let post = Post::from_row(&row()).unwrap();
        assert_eq!(post.attribute("post_title"), Some("Hello world".into()));
        assert_eq!(post.attribute("ID"), Some(ColumnValue::Int(12)));
        assert_eq!(post.attribute("meta_ordering"), Some(ColumnValue::Null));
        assert!(matches!(
            post.try_attribute("nope"),
            Err(PressError::UnknownAttribute { model: "Post", .. })
        ));
    }
}
