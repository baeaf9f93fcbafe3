//! Session, guard and screen flows against the mock API

mod support;

use app::forms::{AccountSettings, LoginForm, RegisterForm};
use app::views::LibraryView;
use app::{Route, Screen};
use client::TokenStore;
use common::models::Role;
use mock_api::MockServer;

use support::{app_for, signed_in};

#[tokio::test]
async fn test_login_then_library() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    server.seed_user("reader", "secret1", Role::User).await?;
    server.seed_manga("Published", true).await?;
    server.seed_manga("Draft", false).await?;

    let (app, tokens) = app_for(&server)?;
    app.mount().await;
    assert!(!app.session().is_loading());
    assert!(app.session().user().is_none());

    let mut form = LoginForm {
        username: "reader".to_string(),
        password: "secret1".to_string(),
        ..LoginForm::new()
    };
    assert!(form.submit(app.session()).await);
    assert!(form.error.is_none());
    assert!(tokens.get()?.is_some());
    assert_eq!(app.session().user().map(|u| u.username), Some("reader".to_string()));
    assert_eq!(app.navigator().current(), Route::Library);

    match app.open(Route::Library).await {
        Screen::Library(view) => {
            let titles: Vec<_> = view.manga.iter().map(|m| m.title.as_str()).collect();
            assert_eq!(titles, vec!["Published"]);
        }
        other => panic!("unexpected screen: {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_shows_server_message() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    server.seed_user("reader", "secret1", Role::User).await?;
    let (app, tokens) = app_for(&server)?;
    app.mount().await;

    let mut form = LoginForm {
        username: "reader".to_string(),
        password: "wrong".to_string(),
        ..LoginForm::new()
    };
    assert!(!form.submit(app.session()).await);
    assert_eq!(form.error.as_deref(), Some("Incorrect username or password"));
    assert!(tokens.get()?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_guard_blocks_protected_fetches() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Hidden", true).await?;
    let (app, _) = app_for(&server)?;
    app.mount().await;

    for route in [
        Route::Library,
        Route::Manga(manga.id),
        Route::Read(1),
        Route::Settings,
        Route::Admin,
        Route::AdminUsers,
        Route::AdminSettings,
    ] {
        match app.open(route).await {
            Screen::Redirect(Route::Login) => {}
            other => panic!("{} rendered {:?}", route, other),
        }
        assert_eq!(app.navigator().current(), Route::Login);
    }

    assert_eq!(server.count_requests("GET /api/manga").await, 0);
    assert_eq!(server.count_requests("GET /api/chapters").await, 0);
    assert_eq!(server.count_requests("GET /api/admin").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_screens_wait_for_session() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = app_for(&server)?;

    assert!(matches!(app.open(Route::Library).await, Screen::Loading));
    assert!(matches!(app.open(Route::Login).await, Screen::Login(_)));
    assert_eq!(server.count_requests("GET /api/manga").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_regular_user_is_kept_out_of_admin() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    for route in [
        Route::Admin,
        Route::AdminUpload,
        Route::AdminUsers,
        Route::AdminSettings,
    ] {
        assert!(matches!(
            app.open(route).await,
            Screen::Redirect(Route::Library)
        ));
    }
    assert_eq!(server.count_requests("GET /api/admin").await, 0);
    assert!(!app.nav_bar().links.contains(&app::nav::NavLink::Admin));

    Ok(())
}

#[tokio::test]
async fn test_mount_checks_identity_once() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    app.mount().await;
    app.mount().await;
    assert_eq!(server.count_requests("GET /api/auth/me").await, 1);

    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_discarded_on_start() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    server.seed_user("reader", "secret1", Role::User).await?;
    let (app, tokens) = app_for(&server)?;
    tokens.set(&server.expired_token_for("reader")?)?;

    app.mount().await;
    let state = app.session().settled().await;
    assert!(state.user.is_none());
    assert!(tokens.get()?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_response_ends_session() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, tokens) = signed_in(&server, "boss", Role::Admin).await?;

    tokens.set(&server.expired_token_for("boss")?)?;
    assert!(matches!(
        app.open(Route::Admin).await,
        Screen::Redirect(Route::Login)
    ));
    assert!(app.session().user().is_none());
    assert!(tokens.get()?.is_none());
    assert_eq!(app.navigator().current(), Route::Login);

    Ok(())
}

#[tokio::test]
async fn test_logout_clears_token() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, tokens) = signed_in(&server, "reader", Role::User).await?;

    app.logout();
    assert!(tokens.get()?.is_none());
    assert!(app.session().user().is_none());
    assert_eq!(app.navigator().current(), Route::Login);
    assert!(matches!(
        app.open(Route::Library).await,
        Screen::Redirect(Route::Login)
    ));

    Ok(())
}

#[tokio::test]
async fn test_manga_detail_lists_chapters_in_order() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Ordered", true).await?;
    for number in [3, 1, 2] {
        server
            .seed_chapter(manga.id, number, None, &["001.jpg"])
            .await?;
    }
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    match app.open(Route::Manga(manga.id)).await {
        Screen::Manga(view) => {
            let numbers: Vec<_> = view.chapters.iter().map(|c| c.chapter_number).collect();
            assert_eq!(numbers, vec![1, 2, 3]);
            assert_eq!(view.start_reading(), Some(Route::Read(view.chapters[0].id)));
        }
        other => panic!("unexpected screen: {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_unpublished_manga_is_not_found() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Draft", false).await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    match app.open(Route::Manga(manga.id)).await {
        Screen::Failed { route, message } => {
            assert_eq!(route, Route::Manga(manga.id));
            assert_eq!(message, "Manga not found");
        }
        other => panic!("unexpected screen: {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_reader_pages_and_download() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Pages", true).await?;
    let chapter = server
        .seed_chapter(manga.id, 1, Some("Start"), &["10.jpg", "2.jpg", "1.jpg"])
        .await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    let Screen::Read(view) = app.open(Route::Read(chapter.id)).await else {
        panic!("reader did not open");
    };
    let names: Vec<_> = (0..view.reader.page_count())
        .filter_map(|i| view.reader.page_filename(i))
        .collect();
    assert_eq!(names, vec!["1.jpg", "2.jpg", "10.jpg"]);

    let dir = tempfile::tempdir()?;
    let written = view
        .download(app.api(), &app.navigator().token(), dir.path())
        .await?;
    assert_eq!(written.len(), 3);
    let first = std::fs::read_to_string(dir.path().join("1.jpg"))?;
    assert_eq!(first, format!("page:{}:1.jpg", chapter.id));

    Ok(())
}

#[tokio::test]
async fn test_download_skips_pages_that_escape_the_directory() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let manga = server.seed_manga("Traversal", true).await?;
    let chapter = server
        .seed_chapter(manga.id, 1, None, &["1.jpg", "..", ".", ""])
        .await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    let Screen::Read(view) = app.open(Route::Read(chapter.id)).await else {
        panic!("reader did not open");
    };
    assert_eq!(view.reader.page_count(), 4);

    let root = tempfile::tempdir()?;
    let dir = root.path().join("chapter");
    let written = view
        .download(app.api(), &app.navigator().token(), &dir)
        .await?;
    assert_eq!(written, vec![dir.join("1.jpg")]);
    assert_eq!(std::fs::read_dir(root.path())?.count(), 1);
    assert_eq!(
        server
            .count_requests(&format!("GET /api/chapters/{}/pages/", chapter.id))
            .await,
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_leaving_a_route_cancels_its_load() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    let token = app.navigator().push(Route::Library);
    app.navigator().push(Route::Settings);

    let result = LibraryView::load(app.api(), &token).await;
    assert!(matches!(result, Err(client::ClientError::Cancelled)));
    assert_eq!(server.count_requests("GET /api/manga").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_registration_follows_admin_toggle() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    server.set_registration(true).await;
    let (admin, _) = signed_in(&server, "boss", Role::Admin).await?;

    let Screen::Settings(mut settings) = admin.open(Route::AdminSettings).await else {
        panic!("settings did not open");
    };
    assert!(!settings.toggle_registration(admin.api()).await?);

    let (visitor, _) = app_for(&server)?;
    visitor.mount().await;
    let Screen::Register(mut form) = visitor.open(Route::Register).await else {
        panic!("register did not open");
    };
    assert!(!form.allowed);
    form.username = "newbie".to_string();
    form.email = "newbie@example.com".to_string();
    form.password = "secret1".to_string();
    assert!(!form.submit(visitor.session()).await);
    assert_eq!(server.count_requests("POST /api/auth/register").await, 0);

    assert!(settings.toggle_registration(admin.api()).await?);
    let mut form = RegisterForm {
        username: "newbie".to_string(),
        email: "newbie@example.com".to_string(),
        password: "secret1".to_string(),
        ..RegisterForm::load(visitor.api()).await
    };
    assert!(form.allowed);
    assert!(form.submit(visitor.session()).await, "{:?}", form.error);
    assert_eq!(
        visitor.session().user().map(|u| u.username),
        Some("newbie".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_password_change() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, _) = signed_in(&server, "reader", Role::User).await?;

    let mut settings = AccountSettings::new(app.session().user());
    settings.current_password = "secret1".to_string();
    settings.new_password = "secret2".to_string();
    settings.confirm_password = "secret3".to_string();
    assert!(!settings.change_password(app.session()).await);
    assert_eq!(settings.error.as_deref(), Some("New passwords do not match"));

    settings.confirm_password = "secret2".to_string();
    settings.current_password = "nope".to_string();
    assert!(!settings.change_password(app.session()).await);
    assert_eq!(settings.error.as_deref(), Some("Incorrect current password"));
    assert_eq!(server.count_requests("PUT /api/auth/password").await, 1);

    settings.current_password = "secret1".to_string();
    assert!(settings.change_password(app.session()).await);
    assert!(settings.success.is_some());
    assert!(settings.new_password.is_empty());

    let login = app.api().auth().login("reader", "secret2").await;
    assert!(login.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_account_deletion_needs_confirmation() -> anyhow::Result<()> {
    let server = MockServer::spawn().await?;
    let (app, tokens) = signed_in(&server, "reader", Role::User).await?;

    let mut settings = AccountSettings::new(app.session().user());
    assert!(!settings.confirm_delete(app.session()).await);
    assert_eq!(server.count_requests("DELETE /api/auth/account").await, 0);

    settings.request_delete();
    assert!(settings.confirm_delete(app.session()).await);
    assert!(tokens.get()?.is_none());
    assert!(app.session().user().is_none());
    assert_eq!(app.navigator().current(), Route::Library);
    assert!(matches!(
        app.open(Route::Library).await,
        Screen::Redirect(Route::Login)
    ));

    Ok(())
}
