//! Command line front end

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use common::models::{Role, User};

use crate::admin::{ChapterFile, CreateUserForm, MangaEditor, Notice, Rollback, UploadError};
use crate::app::{App, Screen};
use crate::forms::{LoginForm, RegisterForm};
use crate::guard::GuardOutcome;
use crate::navigation::Route;
use crate::reader::ReadingMode;

#[derive(Parser, Debug)]
#[command(name = "manga-reader", author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL, overrides MANGA_READER_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        username: String,
        /// Read from stdin when omitted
        password: Option<String>,
    },
    /// Create an account and sign in with it
    Register {
        username: String,
        email: String,
        /// Read from stdin when omitted
        password: Option<String>,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List published manga
    Library,
    /// Show a manga and its chapters
    Manga { id: i64 },
    /// Open a chapter
    Read {
        chapter_id: i64,
        #[arg(long, default_value = "webtoon")]
        mode: ReadingMode,
        /// One-based page to open in manga mode
        #[arg(long)]
        page: Option<usize>,
        /// Download every page into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Change your password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Permanently delete your account
    DeleteAccount {
        #[arg(long)]
        yes: bool,
    },
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Stats,
    Users,
    CreateUser {
        username: String,
        email: String,
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    SetRole { user_id: i64, role: Role },
    SetActive {
        user_id: i64,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    ResetPassword { user_id: i64, password: String },
    DeleteUser { user_id: i64 },
    /// Create a manga from chapter archives, numbered in the given order
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Chapter archive; repeat for each chapter
        #[arg(long = "chapter", required = true)]
        chapters: Vec<PathBuf>,
        /// Chapter title, matched to `--chapter` by position
        #[arg(long = "chapter-title")]
        chapter_titles: Vec<String>,
    },
    /// Edit a published manga
    EditManga {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        cover_image: Option<String>,
        /// Hide the manga from the library
        #[arg(long, conflicts_with = "publish")]
        unpublish: bool,
        #[arg(long)]
        publish: bool,
    },
    /// Delete a manga and its chapters
    DeleteManga {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Show or set public registration
    Registration {
        #[arg(value_parser = ["on", "off"])]
        state: Option<String>,
    },
    /// Show site configuration, or set KEY to VALUE
    Config {
        key: Option<String>,
        #[arg(requires = "key")]
        value: Option<String>,
    },
}

/// Unwrap a screen, turning guard and load outcomes into errors
fn rendered(screen: Screen) -> Result<Screen> {
    match screen {
        Screen::Loading => bail!("Session is still loading"),
        Screen::Redirect(Route::Login) => {
            bail!("Not logged in. Run `manga-reader login` first")
        }
        Screen::Redirect(_) => bail!("Admin access required"),
        Screen::Cancelled => bail!("Request cancelled"),
        Screen::Failed { message, .. } => Err(anyhow!(message)),
        screen => Ok(screen),
    }
}

/// Run the guard for an action without a screen of its own
fn authorize(app: &App, route: Route) -> Result<()> {
    match app.authorize(route) {
        GuardOutcome::Allow(_) => Ok(()),
        GuardOutcome::Loading => rendered(Screen::Loading).map(drop),
        GuardOutcome::Redirect(target) => rendered(Screen::Redirect(target)).map(drop),
    }
}

fn unexpected(route: Route) -> anyhow::Error {
    anyhow!("Unexpected screen for {}", route)
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn describe(user: &User) -> String {
    format!("{} <{}> ({})", user.username, user.email, user.role)
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let mut form = LoginForm {
                username,
                password,
                ..LoginForm::new()
            };
            if !form.submit(app.session()).await {
                bail!(form.error.unwrap_or_else(|| "Login failed".to_string()));
            }
            if let Some(user) = app.session().user() {
                println!("Logged in as {}", describe(&user));
            }
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let mut form = RegisterForm::load(app.api()).await;
            if !form.allowed {
                bail!("Registration is currently disabled");
            }
            form.username = username;
            form.email = email;
            form.password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            if !form.submit(app.session()).await {
                bail!(form.error.unwrap_or_else(|| "Registration failed".to_string()));
            }
            println!("Account created, logged in as {}", form.username);
        }
        Command::Logout => {
            app.logout();
            println!("Logged out");
        }
        Command::Whoami => match app.session().user() {
            Some(user) => println!("{}", describe(&user)),
            None => bail!("Not logged in"),
        },
        Command::Library => match rendered(app.open(Route::Library).await)? {
            Screen::Library(view) => print!("{}", view),
            _ => return Err(unexpected(Route::Library)),
        },
        Command::Manga { id } => match rendered(app.open(Route::Manga(id)).await)? {
            Screen::Manga(view) => print!("{}", view),
            _ => return Err(unexpected(Route::Manga(id))),
        },
        Command::Read {
            chapter_id,
            mode,
            page,
            out,
        } => {
            let route = Route::Read(chapter_id);
            let Screen::Read(mut view) = rendered(app.open(route).await)? else {
                return Err(unexpected(route));
            };
            view.reader.set_mode(mode);
            if let Some(page) = page {
                view.reader.go_to(page.saturating_sub(1));
            }
            print!("{}", view);

            if let Some(dir) = out {
                let token = app.navigator().token();
                let written = view.download(app.api(), &token, &dir).await?;
                println!("Saved {} pages to {}", written.len(), dir.display());
            }
        }
        Command::Password {
            current,
            new,
            confirm,
        } => {
            let Screen::Account(mut settings) = rendered(app.open(Route::Settings).await)? else {
                return Err(unexpected(Route::Settings));
            };
            settings.current_password = current;
            settings.new_password = new;
            settings.confirm_password = confirm;
            if !settings.change_password(app.session()).await {
                bail!(settings.error.unwrap_or_default());
            }
            println!("{}", settings.success.unwrap_or_default());
        }
        Command::DeleteAccount { yes } => {
            if !yes {
                bail!("This permanently deletes your account. Pass --yes to confirm");
            }
            let Screen::Account(mut settings) = rendered(app.open(Route::Settings).await)? else {
                return Err(unexpected(Route::Settings));
            };
            settings.request_delete();
            if !settings.confirm_delete(app.session()).await {
                bail!(settings.error.unwrap_or_default());
            }
            println!("Account deleted");
        }
        Command::Admin(command) => run_admin(app, command).await?,
    }
    Ok(())
}

async fn run_admin(app: &App, command: AdminCommand) -> Result<()> {
    let api = app.api();
    match command {
        AdminCommand::Stats => match rendered(app.open(Route::Admin).await)? {
            Screen::Dashboard(dashboard) => print!("{}", dashboard),
            _ => return Err(unexpected(Route::Admin)),
        },
        AdminCommand::Users => match rendered(app.open(Route::AdminUsers).await)? {
            Screen::Users(users) => print!("{}", users),
            _ => return Err(unexpected(Route::AdminUsers)),
        },
        AdminCommand::Upload {
            title,
            description,
            chapters,
            chapter_titles,
        } => {
            let Screen::Upload(mut form) = rendered(app.open(Route::AdminUpload).await)? else {
                return Err(unexpected(Route::AdminUpload));
            };
            form.title = title;
            form.description = description;
            for (index, path) in chapters.iter().enumerate() {
                let draft = if index == 0 {
                    form.chapter_mut(0).ok_or_else(|| unexpected(Route::AdminUpload))?
                } else {
                    form.add_chapter()
                };
                draft.file = Some(ChapterFile::read(path).await?);
                draft.title = chapter_titles.get(index).cloned().unwrap_or_default();
            }

            match form.submit(api).await {
                Ok(report) => {
                    println!("{}", form.success.unwrap_or_default());
                    println!("Manga id: {}", report.manga.id);
                }
                Err(UploadError::Failed {
                    message,
                    rollback,
                    source,
                    ..
                }) => {
                    app.handle_error(&source);
                    match rollback {
                        Rollback::Failed(reason) => {
                            bail!("{} (rollback failed: {})", message, reason)
                        }
                        _ => bail!(message),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        AdminCommand::EditManga {
            id,
            title,
            description,
            cover_image,
            unpublish,
            publish,
        } => {
            authorize(app, Route::Admin)?;
            let mut editor = match MangaEditor::load(api, id).await {
                Ok(editor) => editor,
                Err(e) => {
                    app.handle_error(&e);
                    bail!(e.user_message("Manga not found"));
                }
            };
            if let Some(title) = title {
                editor.title = title;
            }
            if let Some(description) = description {
                editor.description = description;
            }
            if let Some(cover_image) = cover_image {
                editor.cover_image = cover_image;
            }
            if publish || unpublish {
                editor.is_published = publish;
            }
            if let Err(e) = editor.save(api).await {
                app.handle_error(&e);
                bail!(editor.error.unwrap_or_else(|| e.to_string()));
            }
            let manga = editor.manga();
            let status = if manga.is_published { "published" } else { "hidden" };
            println!("Saved \"{}\" ({})", manga.title, status);
        }
        AdminCommand::DeleteManga { id, yes } => {
            if !yes {
                bail!("This deletes the manga and all its chapters. Pass --yes to confirm");
            }
            authorize(app, Route::Admin)?;
            let mut editor = match MangaEditor::load(api, id).await {
                Ok(editor) => editor,
                Err(e) => {
                    app.handle_error(&e);
                    bail!(e.user_message("Manga not found"));
                }
            };
            editor.request_delete();
            if let Err(e) = editor.delete(api).await {
                app.handle_error(&e);
                bail!(editor.error.unwrap_or_else(|| e.to_string()));
            }
            println!("Deleted \"{}\"", editor.manga().title);
        }
        AdminCommand::Registration { state } => {
            let Screen::Settings(mut settings) = rendered(app.open(Route::AdminSettings).await)?
            else {
                return Err(unexpected(Route::AdminSettings));
            };
            if let Some(state) = state {
                let enabled = state == "on";
                if let Err(e) = settings.set_registration(api, enabled).await {
                    app.handle_error(&e);
                }
                if let Some(Notice::Error(message)) = settings.notice {
                    bail!(message);
                }
            }
            let registration = if settings.registration_enabled { "on" } else { "off" };
            println!("Registration: {}", registration);
        }
        AdminCommand::Config { key, value } => {
            let Screen::Settings(mut settings) = rendered(app.open(Route::AdminSettings).await)?
            else {
                return Err(unexpected(Route::AdminSettings));
            };
            if let (Some(key), Some(value)) = (key.as_deref(), value.as_deref()) {
                if let Err(e) = settings.set_config(api, key, value).await {
                    app.handle_error(&e);
                    bail!(e.user_message("Failed to update settings"));
                }
            }
            match key {
                Some(key) => match settings.config.get(&key) {
                    Some(value) => println!("{} = {}", key, value),
                    None => bail!("No config entry {}", key),
                },
                None => print!("{}", settings),
            }
        }
        command => {
            let Screen::Users(mut users) = rendered(app.open(Route::AdminUsers).await)? else {
                return Err(unexpected(Route::AdminUsers));
            };
            let result = match command {
                AdminCommand::CreateUser {
                    username,
                    email,
                    password,
                    role,
                } => {
                    let form = CreateUserForm {
                        username,
                        email,
                        password,
                        role,
                    };
                    users
                        .create(api, &form)
                        .await
                        .map(|user| format!("Created {}", describe(&user)))
                }
                AdminCommand::SetRole { user_id, role } => users
                    .set_role(api, user_id, role)
                    .await
                    .map(|user| format!("{} is now {}", user.username, user.role)),
                AdminCommand::SetActive { user_id, active } => users
                    .set_active(api, user_id, active)
                    .await
                    .map(|user| {
                        let status = if user.is_active { "active" } else { "disabled" };
                        format!("{} is now {}", user.username, status)
                    }),
                AdminCommand::ResetPassword { user_id, password } => users
                    .reset_password(api, user_id, &password)
                    .await
                    .map(|()| users.success.clone().unwrap_or_default()),
                AdminCommand::DeleteUser { user_id } => users
                    .delete(api, user_id)
                    .await
                    .map(|()| users.success.clone().unwrap_or_default()),
                _ => return Err(unexpected(Route::AdminUsers)),
            };

            match result {
                Ok(message) => println!("{}", message),
                Err(e) => {
                    app.handle_error(&e);
                    bail!(users.error.unwrap_or_else(|| e.to_string()));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_options() {
        let cli = Cli::try_parse_from([
            "manga-reader",
            "read",
            "12",
            "--mode",
            "manga",
            "--page",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Read {
                chapter_id,
                mode,
                page,
                out,
            } => {
                assert_eq!(chapter_id, 12);
                assert_eq!(mode, ReadingMode::Manga);
                assert_eq!(page, Some(3));
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn upload_requires_a_chapter() {
        assert!(Cli::try_parse_from(["manga-reader", "admin", "upload", "--title", "T"]).is_err());

        let cli = Cli::try_parse_from([
            "manga-reader",
            "--api-url",
            "http://localhost:9000",
            "admin",
            "upload",
            "--title",
            "T",
            "--chapter",
            "c1.zip",
            "--chapter",
            "c2.zip",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Command::Admin(AdminCommand::Upload { chapters, .. }) => assert_eq!(chapters.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn registration_state_is_restricted() {
        assert!(Cli::try_parse_from(["manga-reader", "admin", "registration", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["manga-reader", "admin", "registration", "off"]).is_ok());
    }

    #[test]
    fn roles_parse() {
        let cli = Cli::try_parse_from(["manga-reader", "admin", "set-role", "4", "admin"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Admin(AdminCommand::SetRole {
                user_id: 4,
                role: Role::Admin
            })
        ));
    }
}
