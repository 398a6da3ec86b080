use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

use server::entity::{file_upload, space, space_content};

use crate::common::{TestApp, routes};

fn ids(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|s| s["space_id"].as_str().unwrap().to_string())
        .collect()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn root_space_gets_defaults() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app
            .post(routes::SPACES, &json!({"name": "Portfolio", "userId": user_id}))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["space_id"].as_str().unwrap().starts_with("SPACE_"));
        assert_eq!(res.body["description"], "No description provided");
        assert_eq!(res.body["color"], "#3498db");
        assert_eq!(res.body["is_child_space"], false);
        assert!(res.body["parent_space_id"].is_null());
        assert_eq!(res.body["child_count"], 0);
    }

    #[tokio::test]
    async fn child_space_references_its_parent() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let parent = app.create_space(user_id, "Work", None).await;

        let res = app
            .post(
                routes::SPACES,
                &json!({"name": "Projects", "userId": user_id, "parentId": parent}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["parent_space_id"], parent.as_str());
        assert_eq!(res.body["is_child_space"], true);
        assert_eq!(res.body["parent_name"], "Work");

        let children = app.get(&routes::space_children(&parent)).await;
        assert_eq!(children.status, 200);
        assert_eq!(ids(&children.body), vec![res.str_field("space_id")]);

        let parent_view = app.get(&routes::space(&parent)).await;
        assert_eq!(parent_view.body["child_count"], 1);
    }

    #[tokio::test]
    async fn child_flag_follows_the_parent_not_the_request() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app
            .post(
                routes::SPACES,
                &json!({"name": "Loose", "userId": user_id, "isChildSpace": true}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["is_child_space"], false);
    }

    #[tokio::test]
    async fn unknown_parent_is_not_found() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app
            .post(
                routes::SPACES,
                &json!({"name": "Orphan", "userId": user_id, "parentId": "SPACE_0_missing"}),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Parent space not found");
    }

    #[tokio::test]
    async fn database_rejects_a_dangling_parent_reference() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let now = chrono::Utc::now();

        let result = space::ActiveModel {
            space_id: Set("SPACE_1_orphan".into()),
            name: Set("Orphan".into()),
            description: Set("No description provided".into()),
            color: Set("#3498db".into()),
            user_id: Set(user_id as i32),
            parent_space_id: Set(Some("SPACE_0_gone".into())),
            is_child_space: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&app.db)
        .await;

        assert!(result.is_err());
        let count = space::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app.post(routes::SPACES, &json!({"userId": user_id})).await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_owner_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::SPACES, &json!({"name": "Ghost", "userId": 777}))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn root_and_user_listings() {
        let app = TestApp::spawn().await;
        let ada = app.create_user("ada@example.com").await;
        let bob = app.create_user("bob@example.com").await;
        let ada_root = app.create_space(ada, "Ada root", None).await;
        let ada_child = app.create_space(ada, "Ada child", Some(&ada_root)).await;
        let bob_root = app.create_space(bob, "Bob root", None).await;

        let roots = app.get(routes::ROOT_SPACES).await;
        assert_eq!(roots.status, 200);
        assert_eq!(ids(&roots.body), vec![bob_root.clone(), ada_root.clone()]);

        let ada_all = app.get(&routes::user_spaces(ada)).await;
        assert_eq!(ids(&ada_all.body), vec![ada_child, ada_root.clone()]);

        let ada_roots = app.get(&routes::user_root_spaces(ada)).await;
        assert_eq!(ids(&ada_roots.body), vec![ada_root]);
    }

    #[tokio::test]
    async fn unknown_space_is_not_found() {
        let app = TestApp::spawn().await;

        assert_eq!(app.get(&routes::space("SPACE_0_nope")).await.status, 404);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn only_allow_listed_fields_change() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let space_id = app.create_space(user_id, "Work", None).await;

        let res = app
            .put(
                &routes::space(&space_id),
                &json!({"name": "Office", "color": "#000000", "user_id": 99}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Office");
        assert_eq!(res.body["color"], "#000000");
        assert_eq!(res.body["user_id"], user_id);
    }

    #[tokio::test]
    async fn nothing_to_update_is_rejected() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let space_id = app.create_space(user_id, "Work", None).await;

        let res = app
            .put(&routes::space(&space_id), &json!({"parent_space_id": null}))
            .await;

        assert_eq!(res.status, 400);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn cascades_to_descendants_content_and_files() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let root = app.create_space(user_id, "Root", None).await;
        let child = app.create_space(user_id, "Child", Some(&root)).await;
        let grandchild = app.create_space(user_id, "Grandchild", Some(&child)).await;
        let sibling = app.create_space(user_id, "Sibling", None).await;

        app.add_content(&root, "notes", json!({"text": "top"})).await;
        app.add_content(
            &grandchild,
            "upload",
            json!({"fileName": "a.txt", "fileContent": "aGVsbG8="}),
        )
        .await;
        let kept = app.add_content(&sibling, "url", json!({"url": "https://x"})).await;

        let res = app.delete(&routes::space(&root)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["deletedSpaceId"], root.as_str());

        for gone in [&root, &child, &grandchild] {
            assert_eq!(app.get(&routes::space(gone)).await.status, 404);
        }

        let remaining_spaces = space::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(remaining_spaces, 1);

        let remaining_content = space_content::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(remaining_content.len(), 1);
        assert_eq!(remaining_content[0].content_id, kept);

        let files = file_upload::Entity::find()
            .filter(file_upload::Column::UserId.eq(user_id as i32))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(files, 0);
    }

    #[tokio::test]
    async fn missing_space_is_not_found() {
        let app = TestApp::spawn().await;

        assert_eq!(app.delete(&routes::space("SPACE_0_nope")).await.status, 404);
    }
}
