use std::sync::Arc;

use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{OutputFormat, RemoteArgs};
use crate::client::AuthApi;
use crate::config;
use crate::guard::{MessageLog, NavigationOutcome, Navigator, RouteAccessGuard};
use crate::router::{defaults, MenuRouteGenerator, RouteGenerator, RouteRecord, RouteTable, StaticRouteGenerator};

#[derive(Args)]
pub struct NavigateArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    #[arg(long, conflicts_with = "username", help = "Use this token instead of the stored one")]
    pub token: Option<String>,

    #[arg(long, requires = "password", help = "Log in as this user before navigating")]
    pub username: Option<String>,

    #[arg(long, env = "ADMIN_PANEL_PASSWORD", help = "Password for --username")]
    pub password: Option<String>,

    #[arg(long, help = "Derive routes from the server menu tree instead of the built-in definitions")]
    pub menu_routes: bool,

    #[arg(required = true, help = "Paths to visit, in order")]
    pub paths: Vec<String>,
}

pub async fn handle(args: NavigateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let nav_config = config::config().navigation.clone();
    let api: Arc<dyn AuthApi> = Arc::new(args.remote.api()?);
    let session = args.remote.session()?;
    if let Some(token) = &args.token {
        session.set_token(token);
    }
    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        session.login(api.as_ref(), username, password).await?;
    }

    let generator: Arc<dyn RouteGenerator> = if args.menu_routes {
        let fallback = vec![RouteRecord::new("*").redirect("/404").hidden()];
        Arc::new(MenuRouteGenerator::new(api.clone(), session.clone()).with_fallback(fallback))
    } else {
        Arc::new(StaticRouteGenerator::new(defaults::async_routes()).with_super_role(nav_config.super_role.clone()))
    };

    let routes = Arc::new(RouteTable::new(defaults::constant_routes()));
    let notices = Arc::new(MessageLog::new());
    let guard = RouteAccessGuard::new(nav_config, session, api, generator, routes).with_notifier(notices.clone());
    let navigator = Navigator::new(Arc::new(guard));

    for path in &args.paths {
        let outcome = navigator.push(path).await?;
        let notes = notices.drain();

        match output_format {
            OutputFormat::Json => {
                let data = match &outcome {
                    NavigationOutcome::Arrived {
                        location,
                        route,
                        title,
                        hops,
                    } => json!({
                        "requested": path,
                        "arrived": location.full_path(),
                        "route": route,
                        "title": title,
                        "hops": hops,
                        "notices": notes,
                    }),
                    NavigationOutcome::NotFound { location, hops } => json!({
                        "requested": path,
                        "not_found": location.full_path(),
                        "hops": hops,
                        "notices": notes,
                    }),
                };
                output_success(&output_format, "navigated", Some(data))?;
            }
            OutputFormat::Text => {
                for note in &notes {
                    eprintln!("! {}", note);
                }
                match &outcome {
                    NavigationOutcome::Arrived { location, title, .. } => {
                        println!("{} -> {} ({})", path, location.full_path(), title)
                    }
                    NavigationOutcome::NotFound { location, .. } => {
                        println!("{} -> {} (no matching route)", path, location.full_path())
                    }
                }
            }
        }
    }

    Ok(())
}
