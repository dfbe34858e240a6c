//! Client-association counter.

use models::client_service;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Number of clients linked to `service_id`. Unknown services count zero.
///
/// Not scoped to the caller's tenant; callers gate it by role only.
pub async fn count_clients_for_service(db: &DatabaseConnection, service_id: Uuid) -> Result<u64, ServiceError> {
    let n = client_service::Entity::find()
        .filter(client_service::Column::ServiceId.eq(service_id))
        .count(db)
        .await?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role};
    use crate::test_support::{get_db, new_catalog, service_named};

    #[tokio::test]
    async fn counts_links_per_service() -> anyhow::Result<()> {
        let db = get_db().await?;
        let catalog = new_catalog(&db).await?;
        let p = Principal::new("u1", Role::AgencyAdmin, Uuid::new_v4());
        let a = catalog.create(&p, service_named("A")).await?.service.id;
        let b = catalog.create(&p, service_named("B")).await?.service.id;
        for _ in 0..3 {
            models::client_service::link(&db, Uuid::new_v4(), a).await?;
        }
        models::client_service::link(&db, Uuid::new_v4(), b).await?;

        assert_eq!(count_clients_for_service(&db, a).await?, 3);
        assert_eq!(count_clients_for_service(&db, b).await?, 1);
        assert_eq!(count_clients_for_service(&db, Uuid::new_v4()).await?, 0);
        Ok(())
    }
}
