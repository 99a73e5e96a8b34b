use super::taxonomy::attach_terms;
use super::{Attributes, Discriminator, Entity, Post, PostColumn, PostEntity, Taxonomy, TaxonomyEntity};
use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::query::SelectQuery;
use crate::relation::eager::distinct_keys;
use crate::relation::{load_many_to_many, Pivot, RelationDef};
use crate::row::{ColumnValue, FromRow, Row};
use sea_query::Order;
use serde::Serialize;
use std::ops::Deref;

/// A navigation menu: the `nav_menu` taxonomy with its items
///
/// Fetching a menu always loads its term and its items, items sorted by
/// `menu_order` ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    #[serde(flatten)]
    pub taxonomy: Taxonomy,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub const TAXONOMY: &'static str = "nav_menu";

    pub(crate) const ITEMS: RelationDef = RelationDef::belongs_to_many(
        "items",
        ("term_taxonomy", "term_taxonomy_id"),
        ("posts", "ID"),
        Pivot {
            table: "term_relationships",
            from_col: "term_taxonomy_id",
            to_col: "object_id",
        },
    );

    /// Items of this menu, ordered by `menu_order`
    pub fn items<'c, E: PressExecutor>(&self, conn: &'c Connection<E>) -> SelectQuery<'c, MenuItem, E> {
        ordered_items(Self::ITEMS.query_for(conn, self.taxonomy.term_taxonomy_id))
    }

    pub fn into_inner(self) -> Taxonomy {
        self.taxonomy
    }
}

fn ordered_items<E: PressExecutor>(query: SelectQuery<'_, MenuItem, E>) -> SelectQuery<'_, MenuItem, E> {
    let menu_order = query.col(PostColumn::MenuOrder);
    query.order_by(menu_order, Order::Asc)
}

impl Deref for Menu {
    type Target = Taxonomy;

    fn deref(&self) -> &Taxonomy {
        &self.taxonomy
    }
}

impl FromRow for Menu {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Ok(Self {
            taxonomy: Taxonomy::from_row(row)?,
            items: Vec::new(),
        })
    }
}

impl Entity for Menu {
    const TABLE: &'static str = Taxonomy::TABLE;
    const PRIMARY_KEY: &'static str = Taxonomy::PRIMARY_KEY;
    const NAME: &'static str = "Menu";

    fn scope() -> Option<Discriminator> {
        Some(Discriminator {
            column: "taxonomy",
            value: Self::TAXONOMY,
        })
    }

    fn id(&self) -> i64 {
        self.taxonomy.term_taxonomy_id
    }

    fn eager_load<E: PressExecutor>(models: &mut [Self], conn: &Connection<E>) -> Result<(), PressError> {
        attach_terms(conn, models.iter_mut().map(|menu| &mut menu.taxonomy))?;

        let keys = distinct_keys(models.iter().map(|menu| menu.taxonomy.term_taxonomy_id));
        let query = ordered_items(Self::ITEMS.query_for_many::<MenuItem, E>(conn, &keys));
        let mut items = load_many_to_many(&Self::ITEMS, &keys, query)?;

        for menu in models.iter_mut() {
            menu.items = items
                .remove(&menu.taxonomy.term_taxonomy_id)
                .unwrap_or_default();
        }
        Ok(())
    }
}

impl TaxonomyEntity for Menu {
    fn as_taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}

impl Attributes for Menu {
    const MODEL: &'static str = "Menu";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        self.taxonomy.attribute(name)
    }
}

/// A `nav_menu_item` post
///
/// What the item points at is stored in post meta (`_menu_item_*` keys).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MenuItem(pub Post);

impl MenuItem {
    pub const POST_TYPE: &'static str = "nav_menu_item";

    pub fn into_inner(self) -> Post {
        self.0
    }

    /// Object type the item links to (`page`, `post`, `category`, `custom`, ...)
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the meta query fails.
    pub fn object_type<E: PressExecutor>(&self, conn: &Connection<E>) -> Result<Option<String>, PressError> {
        self.0.meta_value(conn, "_menu_item_object")
    }

    /// Id of the linked object, when the item is not a custom link
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the meta query fails or the value is not an id.
    pub fn object_id<E: PressExecutor>(&self, conn: &Connection<E>) -> Result<Option<i64>, PressError> {
        parse_id(self.0.meta_value(conn, "_menu_item_object_id")?)
    }

    /// Target of a custom link item
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the meta query fails.
    pub fn url<E: PressExecutor>(&self, conn: &Connection<E>) -> Result<Option<String>, PressError> {
        Ok(self
            .0
            .meta_value(conn, "_menu_item_url")?
            .filter(|url| !url.is_empty()))
    }

    /// The item this one is nested under, if any
    ///
    /// # Errors
    ///
    /// Returns `PressError` if a query fails or the stored parent is not an id.
    pub fn parent_item<E: PressExecutor>(&self, conn: &Connection<E>) -> Result<Option<MenuItem>, PressError> {
        match parse_id(self.0.meta_value(conn, "_menu_item_menu_item_parent")?)? {
            Some(id) => MenuItem::find(conn, id),
            None => Ok(None),
        }
    }
}

/// Meta-stored id; empty and `0` mean none
fn parse_id(value: Option<String>) -> Result<Option<i64>, PressError> {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("0") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| PressError::ParseError(format!("invalid menu item reference `{raw}`"))),
    }
}

impl Deref for MenuItem {
    type Target = Post;

    fn deref(&self) -> &Post {
        &self.0
    }
}

impl FromRow for MenuItem {
    fn from_row(row: &Row) -> Result<Self, PressError> {
        Post::from_row(row).map(Self)
    }
}

impl Entity for MenuItem {
    const TABLE: &'static str = Post::TABLE;
    const PRIMARY_KEY: &'static str = Post::PRIMARY_KEY;
    const NAME: &'static str = "MenuItem";

    fn scope() -> Option<Discriminator> {
        Some(Discriminator {
            column: "post_type",
            value: Self::POST_TYPE,
        })
    }

    fn id(&self) -> i64 {
        self.0.id
    }
}

impl PostEntity for MenuItem {}

impl Attributes for MenuItem {
    const MODEL: &'static str = "MenuItem";

    fn attribute(&self, name: &str) -> Option<ColumnValue> {
        self.0.attribute(name)
    }
}
