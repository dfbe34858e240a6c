/// Schema-level tests: constraints and cascades enforced by the database itself.
pub mod schema_tests {
    use anyhow::Result;
    use chrono::Utc;
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, SqlErr};
    use uuid::Uuid;

    use crate::types::UserIds;
    use crate::{audit_log, client_service, db, service, service_checklist, service_subtask, supporting_file};

    async fn migrated_db() -> Result<DatabaseConnection> {
        let db = db::connect_in_memory().await?;
        migration::Migrator::up(&db, None).await?;
        Ok(db)
    }

    fn new_service(agency_id: Uuid, name: &str) -> service::ActiveModel {
        service::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            name: Set(name.to_string()),
            is_enabled: Set(true),
            is_checklist_completion_required: Set(false),
            is_recurring: Set(true),
            auto_task_creation_frequency: Set(Some(service::Frequency::Quarterly)),
            target_date_creation_date: Set(Some(10)),
            assign_auto_tasks_to_users_of_respective_clients: Set(false),
            assign_auto_tasks_to_users: Set(UserIds(vec![Uuid::new_v4()])),
            billing_sac_code: Set(Some("998311".into())),
            billing_gst_percent: Set(18.0),
            billing_default_rate: Set(5000.0),
            billing_default_billable: Set(true),
            create_document_collection_request_automatically: Set(false),
            document_request_default_message: Set(None),
            created_by: Set("owner@example.com".into()),
            created_at: Set(Utc::now().into()),
        }
    }

    #[tokio::test]
    async fn service_round_trips_enum_and_json_columns() -> Result<()> {
        let db = migrated_db().await?;
        let created = new_service(Uuid::new_v4(), "Bookkeeping").insert(&db).await?;
        let found = service::Entity::find_by_id(created.id).one(&db).await?.expect("service row");
        assert_eq!(found.auto_task_creation_frequency, Some(service::Frequency::Quarterly));
        assert_eq!(found.assign_auto_tasks_to_users.len(), 1);
        assert_eq!(found.billing_gst_percent, 18.0);
        Ok(())
    }

    #[tokio::test]
    async fn agency_name_pair_is_unique() -> Result<()> {
        let db = migrated_db().await?;
        let agency = Uuid::new_v4();
        new_service(agency, "GST Filing").insert(&db).await?;

        let err = new_service(agency, "GST Filing").insert(&db).await.unwrap_err();
        assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));

        // same name under another agency is fine
        new_service(Uuid::new_v4(), "GST Filing").insert(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn deleting_service_cascades_children() -> Result<()> {
        let db = migrated_db().await?;
        let svc = new_service(Uuid::new_v4(), "Payroll").insert(&db).await?;

        service_checklist::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(svc.id),
            item_text: Set("Collect payslips".into()),
            is_required: Set(true),
            sort_order: Set(0),
        }
        .insert(&db)
        .await?;
        service_subtask::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(svc.id),
            title: Set("Prepare register".into()),
            description: Set(None),
            due_date: Set(Some(5)),
            target_date: Set(None),
            users: Set(UserIds::default()),
            enable_workflow: Set(false),
            sort_order: Set(0),
        }
        .insert(&db)
        .await?;
        supporting_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(svc.id),
            file_name: Set("template.xlsx".into()),
            file_path: Set("uploads/x/template.xlsx".into()),
            mime_type: Set(None),
            uploaded_by: Set("owner@example.com".into()),
            uploaded_at: Set(Utc::now().into()),
        }
        .insert(&db)
        .await?;
        client_service::link(&db, Uuid::new_v4(), svc.id).await?;

        service::Entity::delete_by_id(svc.id).exec(&db).await?;

        assert_eq!(service_checklist::Entity::find().count(&db).await?, 0);
        assert_eq!(service_subtask::Entity::find().count(&db).await?, 0);
        assert_eq!(supporting_file::Entity::find().count(&db).await?, 0);
        assert_eq!(client_service::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn audit_append_requires_action() -> Result<()> {
        let db = migrated_db().await?;
        assert!(audit_log::append(&db, "u@example.com", " ", "x").await.is_err());
        let row = audit_log::append(&db, "u@example.com", "service.create", "name=Audit").await?;
        assert_eq!(row.action, "service.create");
        Ok(())
    }
}
