//! Query extensions for taxonomy entities.

use crate::executor::PressExecutor;
use crate::model::{TaxonomyColumn, TaxonomyEntity, TermColumn};
use crate::query::{Ident, SelectQuery};
use sea_query::{Asterisk, ConditionalStatement, Expr, ExprTrait, Query};

/// Fluent filters for taxonomy entities
///
/// On a typed taxonomy ([`Category`](crate::Category), [`Menu`](crate::Menu), ...)
/// the discriminator is already part of the query; `name` then only narrows it
/// further, it can never widen it.
pub trait TaxonomyBuilder: Sized {
    /// `taxonomy = name`
    fn name(self, taxonomy: &str) -> Self;

    fn category(self) -> Self {
        self.name("category")
    }

    fn menu(self) -> Self {
        self.name("nav_menu")
    }

    /// Linked term has this slug; an empty slug leaves the query unchanged
    fn slug(self, slug: &str) -> Self;

    /// Alias of [`TaxonomyBuilder::slug`]
    fn term(self, slug: &str) -> Self {
        self.slug(slug)
    }
}

impl<'c, M, E> TaxonomyBuilder for SelectQuery<'c, M, E>
where
    M: TaxonomyEntity,
    E: PressExecutor,
{
    fn name(self, taxonomy: &str) -> Self {
        let column = self.col(TaxonomyColumn::Taxonomy);
        self.filter(Expr::col(column).eq(taxonomy))
    }

    fn slug(self, slug: &str) -> Self {
        if slug.is_empty() {
            return self;
        }

        let terms = Ident::new(self.connection().table("terms"));
        let mut linked = Query::select();
        linked
            .column((terms.clone(), Asterisk))
            .from(terms.clone())
            .and_where(
                Expr::col((terms.clone(), TermColumn::TermId))
                    .equals(self.col(TaxonomyColumn::TermId)),
            )
            .and_where(Expr::col((terms, TermColumn::Slug)).eq(slug));

        self.where_has(linked)
    }
}
