use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
};

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, new: NewMovie) -> AppResult<movie::Model> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: Set(new.id),
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(NewMovie::PLACEHOLDER_RATING),
            ranking: Set(None),
            review: Set(String::new()),
            img_url: Set(new.img_url),
        };

        model.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Duplicate(title),
            _ => AppError::Db(err),
        })
    }

    pub async fn get(&self, id: i64) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(AppError::NotFound(id))
    }

    pub async fn update_review(
        &self,
        id: i64,
        rating: f64,
        review: &str,
    ) -> AppResult<movie::Model> {
        let mut model = self.get(id).await?.into_active_model();
        model.rating = Set(rating);
        model.review = Set(review.to_string());
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }

    /// Ascending rating. Equal ratings put the higher id first, so the
    /// lower id ends up with the better rank.
    pub async fn list_by_rating(&self) -> AppResult<Vec<movie::Model>> {
        Ok(by_rating(&self.db).await?)
    }

    /// Assigns `ranking = count - position` over [`Self::list_by_rating`] and
    /// persists it. Returns the movies best-ranked first.
    pub async fn recompute_rankings(&self) -> AppResult<Vec<movie::Model>> {
        let txn = self.db.begin().await?;
        let movies = by_rating(&txn).await?;
        let ranked = persist_rankings(&txn, movies).await?;
        txn.commit().await?;

        debug!(movies = ranked.len(), "rankings recomputed");
        Ok(ranked)
    }
}

async fn by_rating<C: ConnectionTrait>(conn: &C) -> Result<Vec<movie::Model>, DbErr> {
    movie::Entity::find()
        .order_by_asc(movie::Column::Rating)
        .order_by_desc(movie::Column::Id)
        .all(conn)
        .await
}

/// `movies` must be in [`by_rating`] order. Rows deleted since the read
/// match nothing and are skipped.
async fn persist_rankings<C: ConnectionTrait>(
    conn: &C,
    movies: Vec<movie::Model>,
) -> Result<Vec<movie::Model>, DbErr> {
    let total = movies.len();
    let mut ranked = Vec::with_capacity(total);

    for (position, mut movie) in movies.into_iter().enumerate() {
        let rank = (total - position) as i32;
        if movie.ranking != Some(rank) {
            movie::Entity::update_many()
                .col_expr(movie::Column::Ranking, Expr::value(rank))
                .filter(movie::Column::Id.eq(movie.id))
                .exec(conn)
                .await?;
            movie.ranking = Some(rank);
        }
        ranked.push(movie);
    }

    ranked.reverse();
    Ok(ranked)
}
