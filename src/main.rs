use std::sync::Arc;

use anyhow::{Context, bail};

use lawdesk::config::AppConfig;
use lawdesk::domain::navigation::{GuardDecision, Route, guard, menu_for};
use lawdesk::repository::file::FileCredentialStore;
use lawdesk::telemetry;
use lawdesk::usecase::redirect::RedirectSignal;
use lawdesk::{SessionPhase, SessionStore};

const USAGE: &str = "usage: lawdesk <status | login <email> <password> | logout | menu | open <path> | passwd <current> <new>>";

type Store = SessionStore<FileCredentialStore, Arc<RedirectSignal>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init_subscriber(telemetry::default_env_filter(), config.log_format);
    tracing::debug!(?config, "config loaded");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let redirect = Arc::new(RedirectSignal::new());
    let store = SessionStore::new(
        config.api_url.clone(),
        config.api_timeout(),
        FileCredentialStore::new(config.credentials_path.clone()),
        redirect.clone(),
    )?;

    match (command.as_str(), &args[1..]) {
        ("login", [email, password]) => {
            store.initialize().await;
            let user = store.login(email, password).await?;
            println!("signed in as {} ({})", user.full_name(), user.role.label());
        }
        ("logout", []) => {
            store.initialize().await;
            store.logout().await;
            println!("signed out");
        }
        ("status", []) => {
            store.initialize().await;
            print_status(&store);
        }
        ("menu", []) => {
            store.initialize().await;
            let Some(role) = store.session().role() else {
                bail!("not signed in");
            };
            let menu = menu_for(role);
            for route in menu.main.iter().chain(&menu.admin).chain(&menu.footer) {
                println!("{:<12} {}", route.label(), route.path());
            }
        }
        ("open", [path]) => {
            store.initialize().await;
            let route = Route::resolve(path);
            match guard(&store.session(), route) {
                GuardDecision::Render => println!("{}", route.label()),
                GuardDecision::Redirect(target) => println!("redirected to {}", target.path()),
                GuardDecision::Pending => println!("loading"),
            }
        }
        ("passwd", [current, new]) => {
            store.initialize().await;
            if store.phase() != SessionPhase::Authenticated {
                bail!("not signed in");
            }
            store.change_password(current, new).await?;
            println!("password changed");
        }
        _ => bail!(USAGE),
    }

    if redirect.count() > 0 {
        eprintln!("session expired, please sign in again");
    }

    Ok(())
}

fn print_status(store: &Store) {
    match store.session().user {
        Some(user) => println!("signed in as {} <{}> ({})", user.full_name(), user.email, user.role.label()),
        None => println!("not signed in"),
    }
}
