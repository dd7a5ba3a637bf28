//! Integration tests for license issuance, updates and seeding.

mod helpers;

use licensegate_core::config::SeedLicense;
use licensegate_core::error::ErrorKind;
use licensegate_entity::LicenseChanges;
use licensegate_service::CreateLicense;

fn seeds() -> Vec<SeedLicense> {
    vec![
        SeedLicense {
            key: "seed-a".to_string(),
            active: true,
            limit: 10,
        },
        SeedLicense {
            key: "seed-b".to_string(),
            active: false,
            limit: 0,
        },
    ]
}

#[tokio::test]
async fn test_duplicate_key_leaves_original_untouched() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);
        let original = registry
            .create_license(CreateLicense {
                key: Some("dup".to_string()),
                limit: Some(7),
                active: None,
            })
            .await
            .unwrap();

        let err = registry
            .create_license(CreateLicense {
                key: Some("dup".to_string()),
                limit: Some(99),
                active: Some(false),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey, "{provider}");

        let current = registry.get_by_key("dup").await.unwrap().unwrap();
        assert_eq!(current, original, "{provider}");
    }
}

#[tokio::test]
async fn test_limit_only_update_keeps_active_and_usage() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);
        let created = registry
            .create_license(CreateLicense {
                key: Some("partial".to_string()),
                limit: Some(4),
                active: Some(false),
            })
            .await
            .unwrap();

        let updated = registry
            .update_license(
                "partial",
                LicenseChanges {
                    limit: Some(40),
                    active: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id, "{provider}");
        assert_eq!(updated.limit, 40);
        assert!(!updated.active);
        assert_eq!(updated.usage, 0);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }
}

#[tokio::test]
async fn test_limit_below_usage_is_rejected() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);
        registry
            .create_license(CreateLicense {
                key: Some("shrink".to_string()),
                limit: Some(5),
                active: None,
            })
            .await
            .unwrap();
        let enforcer = helpers::enforcer(&store);
        for _ in 0..3 {
            enforcer.authorize_and_record("shrink", "/api/generate").await.unwrap();
        }
        let before = registry.get_by_key("shrink").await.unwrap().unwrap();

        let err = registry
            .update_license(
                "shrink",
                LicenseChanges {
                    limit: Some(1),
                    active: Some(false),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "{provider}");

        let after = registry.get_by_key("shrink").await.unwrap().unwrap();
        assert_eq!(after, before, "{provider}");
        assert!(after.usage <= after.limit, "{provider}");

        // Lowering exactly to the current usage closes the license.
        let closed = registry
            .update_license(
                "shrink",
                LicenseChanges {
                    limit: Some(3),
                    active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(closed.limit, 3, "{provider}");
        assert_eq!(closed.remaining(), 0, "{provider}");

        let err = enforcer
            .authorize_and_record("shrink", "/api/generate")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded, "{provider}");
    }
}

#[tokio::test]
async fn test_lookup_by_id_and_key_agree() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);
        let created = registry.create_license(CreateLicense::default()).await.unwrap();

        let by_id = registry.get_by_id(created.id).await.unwrap().unwrap();
        let by_key = registry.get_by_key(&created.key).await.unwrap().unwrap();
        assert_eq!(by_id, by_key, "{provider}");
        assert_eq!(by_id.limit, 500);
        assert!(registry.get_by_key("missing").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);

        assert_eq!(registry.seed_defaults(&seeds()).await.unwrap(), 2, "{provider}");
        assert_eq!(registry.seed_defaults(&seeds()).await.unwrap(), 0, "{provider}");
        assert_eq!(registry.list_all().await.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_reseeding_preserves_operator_changes() {
    let (_dir, stores) = helpers::all_stores().await;
    for (provider, store) in stores {
        let registry = helpers::registry(&store);
        registry.seed_defaults(&seeds()).await.unwrap();

        registry
            .update_license(
                "seed-b",
                LicenseChanges {
                    limit: Some(25),
                    active: Some(true),
                },
            )
            .await
            .unwrap();
        helpers::enforcer(&store)
            .authorize_and_record("seed-a", "/api/generate")
            .await
            .unwrap();

        registry.seed_defaults(&seeds()).await.unwrap();

        let b = registry.get_by_key("seed-b").await.unwrap().unwrap();
        assert!(b.active, "{provider}");
        assert_eq!(b.limit, 25);
        let a = registry.get_by_key("seed-a").await.unwrap().unwrap();
        assert_eq!(a.usage, 1, "{provider}");
    }
}
