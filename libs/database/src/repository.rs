//! Generic repository base over SeaORM entities with UUID primary keys.
//!
//! Domain crates wrap `BaseRepository` to implement their repository traits
//! against PostgreSQL, keeping the SeaORM plumbing in one place.
//!
//! # Example
//!
//! ```ignore
//! use database::BaseRepository;
//! use domain_users::entity::{ActiveModel, Entity as Users};
//!
//! let repo: BaseRepository<Users> = BaseRepository::new(db);
//! let created = repo.insert(active_model).await?;
//! let found = repo.find_by_id(created.id).await?;
//! ```

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};
use std::marker::PhantomData;
use uuid::Uuid;

/// Marker trait for entities keyed by a single `Uuid` primary key.
///
/// Blanket-implemented for every SeaORM entity whose primary key value
/// type accepts a `Uuid`.
pub trait UuidEntity: EntityTrait {}

impl<E> UuidEntity for E
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
}

/// Shared CRUD plumbing for SeaORM entities with UUID primary keys.
///
/// Holds the connection and exposes the operations every domain repository
/// needs. Domain-specific queries go through `db()` with SeaORM's query
/// builder directly.
#[derive(Clone)]
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    /// Create a repository over an existing connection.
    ///
    /// `DatabaseConnection` is an `Arc`-backed pool handle, so cloning it
    /// here is cheap.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Access the underlying connection for domain-specific queries.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a new row and return the persisted model.
    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }

    /// Find a row by its UUID primary key.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// Fetch all rows of the entity.
    pub async fn find_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(&self.db).await
    }

    /// Apply an update for the given active model and return the new state.
    pub async fn update<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.update(&self.db).await
    }

    /// Delete a row by its UUID primary key, returning the affected row count.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::entity::prelude::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "widgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    fn widget(id: Uuid) -> Model {
        Model {
            id,
            name: "drill".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_row() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget(id)]])
            .into_connection();

        let repo: BaseRepository<Entity> = BaseRepository::new(db);
        let found = repo.find_by_id(id).await.unwrap();
        assert_eq!(found, Some(widget(id)));
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let repo: BaseRepository<Entity> = BaseRepository::new(db);
        let found = repo.find_by_id(Uuid::now_v7()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_returns_persisted_model() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget(id)]])
            .into_connection();

        let repo: BaseRepository<Entity> = BaseRepository::new(db);
        let created = repo
            .insert(ActiveModel {
                id: Set(id),
                name: Set("drill".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.id, id);
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo: BaseRepository<Entity> = BaseRepository::new(db);
        let deleted = repo.delete_by_id(Uuid::now_v7()).await.unwrap();
        assert_eq!(deleted, 1);
    }
}
