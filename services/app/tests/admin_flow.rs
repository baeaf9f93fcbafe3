//! Admin console flows against the mock API

mod support;

use app::admin::{
    ChapterFile, CreateUserForm, MangaEditor, Rollback, SagaStage, SagaStep, UploadError,
    UploadForm,
};
use app::{Route, Screen};
use common::models::Role;
use mock_api::MockServer;

use support::signed_in;

fn archive(pages: &[&str]) -> Vec<u8> {
    pages.join("\n").into_bytes()
}

fn two_chapter_form() -> UploadForm {
    let mut form = UploadForm::new();
    form.title = "Night Train".to_string();
    form.description = "A long ride".to_string();
    if let Some(first) = form.chapter_mut(0) {
        first.title = "Departure".to_string();
        first.file = Some(ChapterFile::new("c1.zip", archive(&["001.jpg", "002.jpg"])));
    }
    form.add_chapter().file = Some(ChapterFile::new("c2.zip", archive(&["001.jpg"])));
    form
}

#[tokio::test]
async fn test_dashboard_shows_stats() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    server.seed_manga("One", true).await?;
    server.seed_manga("Two", false).await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;

    let Screen::Dashboard(dashboard) = app.open(Route::Admin).await else {
        panic!("dashboard did not open");
    };
    assert_eq!(dashboard.stats.total_users, 1);
    assert_eq!(dashboard.stats.total_manga, 2);
    assert_eq!(dashboard.stats.published_manga, 1);
    assert!(dashboard.to_string().contains("Published manga: 1"));

    Ok(())
}

#[tokio::test]
async fn test_upload_without_files_makes_no_request() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;

    let mut form = UploadForm::new();
    form.title = "Empty".to_string();
    form.add_chapter();

    let result = form.submit(app.api()).await;
    assert!(matches!(result, Err(UploadError::NoChapterFiles)));
    assert_eq!(form.error.as_deref(), Some("Please upload at least one chapter"));
    assert_eq!(server.count_requests("POST /api/manga").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_upload_creates_chapters_then_publishes() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;

    let mut form = two_chapter_form();
    let report = form.submit(app.api()).await?;

    let manga_id = report.manga.id;
    assert!(report.manga.is_published);
    assert_eq!(report.chapters_uploaded(), 2);
    assert_eq!(report.steps.first(), Some(&SagaStep::CreatedManga { manga_id }));
    assert_eq!(report.steps.last(), Some(&SagaStep::Published { manga_id }));

    let stored = server.manga(manga_id).await.expect("manga stored");
    let numbers: Vec<_> = stored.chapters.iter().map(|c| c.chapter_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(stored.chapters[0].title.as_deref(), Some("Departure"));

    assert!(form.title.is_empty());
    assert_eq!(form.chapters().len(), 1);
    assert!(form.success.is_some());

    let lines = server.requests().await;
    let create = lines.iter().position(|l| l == "POST /api/manga");
    let publish = lines
        .iter()
        .position(|l| *l == format!("PUT /api/manga/{}", manga_id));
    assert!(create < publish);

    Ok(())
}

#[tokio::test]
async fn test_failed_chapter_rolls_back_manga() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;
    server.fail_uploads_of(2).await;

    let mut form = two_chapter_form();
    match form.submit(app.api()).await {
        Err(UploadError::Failed {
            stage,
            completed,
            rollback,
            ..
        }) => {
            assert_eq!(stage, SagaStage::UploadChapter(2));
            assert_eq!(rollback, Rollback::Completed);
            assert_eq!(completed.len(), 2);
            assert!(matches!(completed[0], SagaStep::CreatedManga { .. }));
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(server.manga_ids().await.is_empty());
    assert_eq!(server.count_requests("DELETE /api/manga/").await, 1);
    assert!(form.error.is_some());
    assert_eq!(form.title, "Night Train");

    Ok(())
}

#[tokio::test]
async fn test_admin_cannot_modify_own_row() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;
    let me = app.session().user().expect("signed in");

    let Screen::Users(mut users) = app.open(Route::AdminUsers).await else {
        panic!("users did not open");
    };
    assert!(!users.can_modify(me.id));
    assert!(users.set_role(app.api(), me.id, Role::User).await.is_err());
    assert!(users.set_active(app.api(), me.id, false).await.is_err());
    assert!(users.delete(app.api(), me.id).await.is_err());
    assert!(users.error.is_some());
    assert_eq!(server.count_requests("PUT /api/admin/users").await, 0);
    assert_eq!(server.count_requests("DELETE /api/admin/users").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_user_management() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;
    let api = app.api();

    let Screen::Users(mut users) = app.open(Route::AdminUsers).await else {
        panic!("users did not open");
    };

    let form = CreateUserForm {
        username: "helper".to_string(),
        email: "helper@example.com".to_string(),
        password: "secret1".to_string(),
        role: Role::User,
    };
    let helper = users.create(api, &form).await?;
    assert_eq!(users.users().len(), 2);

    let duplicate = users.create(api, &form).await;
    assert!(duplicate.is_err());
    assert_eq!(users.error.as_deref(), Some("Username already registered"));

    let promoted = users.set_role(api, helper.id, Role::Admin).await?;
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(users.user(helper.id).map(|u| u.role), Some(Role::Admin));

    users.set_active(api, helper.id, false).await?;
    assert!(api.auth().login("helper", "secret1").await.is_err());
    users.set_active(api, helper.id, true).await?;

    users.reset_password(api, helper.id, "fresh-pass").await?;
    assert_eq!(users.success.as_deref(), Some("Password reset successfully"));
    assert!(api.auth().login("helper", "fresh-pass").await.is_ok());

    assert!(users.reset_password(api, helper.id, "123").await.is_err());

    users.delete(api, helper.id).await?;
    assert_eq!(users.users().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_admin_creates_free_form_usernames() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;

    let Screen::Users(mut users) = app.open(Route::AdminUsers).await else {
        panic!("users did not open");
    };

    for (name, email) in [
        ("mary-jane", "mj@example.com"),
        ("al", "al@example.com"),
        ("j.doe", "jdoe@example.com"),
    ] {
        let form = CreateUserForm {
            username: name.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            role: Role::User,
        };
        let created = users.create(app.api(), &form).await?;
        assert_eq!(created.username, name);
        assert_eq!(users.error, None);
    }
    assert_eq!(users.users().len(), 4);
    assert_eq!(server.count_requests("POST /api/admin/users").await, 3);

    Ok(())
}

#[tokio::test]
async fn test_saved_change_survives_failed_reload() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let helper = server.seed_user("helper", "secret1", Role::User).await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;
    let api = app.api();

    let Screen::Users(mut users) = app.open(Route::AdminUsers).await else {
        panic!("users did not open");
    };
    server.fail_user_list().await;

    let disabled = users.set_active(api, helper.id, false).await?;
    assert!(!disabled.is_active);
    assert_eq!(users.error.as_deref(), Some("Failed to list users"));
    assert!(api.auth().login("helper", "secret1").await.is_err());

    users.delete(api, helper.id).await?;
    assert_eq!(users.success.as_deref(), Some("User deleted successfully"));
    assert_eq!(users.error.as_deref(), Some("Failed to list users"));
    assert_eq!(server.count_requests("DELETE /api/admin/users").await, 1);

    Ok(())
}

#[tokio::test]
async fn test_site_config_update() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;

    let Screen::Settings(mut settings) = app.open(Route::AdminSettings).await else {
        panic!("settings did not open");
    };
    settings.set_config(app.api(), "site_name", "Manga Shelf").await?;
    assert_eq!(
        settings.config.get("site_name").map(String::as_str),
        Some("Manga Shelf")
    );

    let Screen::Settings(reloaded) = app.open(Route::AdminSettings).await else {
        panic!("settings did not reopen");
    };
    assert_eq!(reloaded.config, settings.config);

    Ok(())
}

#[tokio::test]
async fn test_manga_edit_and_delete() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Tides", true).await?;
    server.seed_chapter(manga.id, 1, None, &["001.jpg"]).await?;
    let (app, _) = signed_in(&server, "boss", Role::Admin).await?;
    let api = app.api();

    let mut editor = MangaEditor::load(api, manga.id).await?;
    editor.title = "Low Tides".to_string();
    editor.is_published = false;
    editor.save(api).await?;
    assert_eq!(editor.manga().title, "Low Tides");
    assert!(!editor.manga().is_published);
    assert!(api.manga().list().await?.is_empty());

    assert!(!editor.delete(api).await?);
    assert_eq!(server.count_requests("DELETE /api/manga/").await, 0);

    editor.request_delete();
    assert!(editor.delete(api).await?);
    assert!(server.manga_ids().await.is_empty());

    Ok(())
}
