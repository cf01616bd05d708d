use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::Filter;

/// Filter-driven reads and deletes over one table
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        self.check_table(&filter);
        QueryBuilder::<T>::new(filter).select_all(&self.pool).await
    }

    pub async fn select_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        self.check_table(&filter);
        QueryBuilder::<T>::new(filter).select_optional(&self.pool).await
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        self.check_table(&filter);
        QueryBuilder::<T>::new(filter).count(&self.pool).await
    }

    pub async fn delete_any(&self, filter: Filter) -> Result<u64, DatabaseError> {
        self.check_table(&filter);
        QueryBuilder::<T>::new(filter).delete(&self.pool).await
    }

    fn check_table(&self, filter: &Filter) {
        debug_assert_eq!(
            filter.table_name(),
            self.table_name,
            "filter built for another table"
        );
    }
}
