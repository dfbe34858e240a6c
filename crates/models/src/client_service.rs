use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, service};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Associate a client with a service.
pub async fn link<C: ConnectionTrait>(db: &C, client_id: Uuid, service_id: Uuid) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        service_id: Set(service_id),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
