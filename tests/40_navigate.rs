mod common;

use std::sync::Arc;
use std::time::Duration;

use admin_panel_rust::client::{AuthApi, ClientError, HttpAuthApi};
use admin_panel_rust::config::NavigationConfig;
use admin_panel_rust::guard::{MessageLog, NavigationOutcome, Navigator, RouteAccessGuard};
use admin_panel_rust::router::{defaults, MenuRouteGenerator, RouteGenerator, RouteRecord, RouteTable, StaticRouteGenerator};
use admin_panel_rust::session::SessionStore;
use anyhow::Result;

fn api(server: &common::TestServer) -> Result<Arc<HttpAuthApi>> {
    Ok(Arc::new(HttpAuthApi::new(&server.base_url, Duration::from_secs(5))?))
}

fn navigator(
    api: Arc<HttpAuthApi>,
    session: Arc<SessionStore>,
    generator: Arc<dyn RouteGenerator>,
    notices: Arc<MessageLog>,
) -> Navigator {
    let guard = RouteAccessGuard::new(
        NavigationConfig::default(),
        session,
        api,
        generator,
        Arc::new(RouteTable::new(defaults::constant_routes())),
    )
    .with_notifier(notices);
    Navigator::new(Arc::new(guard))
}

fn static_routes() -> Arc<dyn RouteGenerator> {
    Arc::new(StaticRouteGenerator::new(defaults::async_routes()).with_super_role(Some("admin".to_string())))
}

#[tokio::test]
async fn client_surfaces_business_codes() -> Result<()> {
    let server = common::ensure_server().await?;
    let api = api(server)?;

    match api.login("admin", "wrong").await {
        Err(ClientError::Api { code, .. }) => assert_eq!(code, 60204),
        other => panic!("expected bad credentials, got {:?}", other),
    }

    let err = api.profile("garbage").await.unwrap_err();
    assert!(err.is_session_invalid(), "{:?}", err);
    Ok(())
}

#[tokio::test]
async fn editor_navigates_against_live_server() -> Result<()> {
    let server = common::ensure_server().await?;
    let api = api(server)?;
    let session = Arc::new(SessionStore::in_memory());
    session.login(api.as_ref(), "editor", "111111").await?;

    let notices = Arc::new(MessageLog::new());
    let nav = navigator(api, session.clone(), static_routes(), notices.clone());

    let outcome = nav.push("/permission/directive").await?;
    assert!(matches!(outcome, NavigationOutcome::Arrived { .. }), "{:?}", outcome);
    assert_eq!(outcome.path(), "/permission/directive");
    assert_eq!(session.roles(), Some(vec!["editor".to_string()]));
    assert_eq!(session.snapshot().name, "Normal Editor");

    let outcome = nav.push("/permission/page").await?;
    assert_eq!(outcome.path(), "/404");
    assert!(notices.messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn visitor_without_roles_is_sent_to_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let api = api(server)?;
    let session = Arc::new(SessionStore::in_memory());
    session.login(api.as_ref(), "visitor", "111111").await?;

    let notices = Arc::new(MessageLog::new());
    let nav = navigator(api, session.clone(), static_routes(), notices.clone());

    let outcome = nav.push("/dashboard").await?;
    assert_eq!(outcome.path(), "/login");
    assert_eq!(session.token(), None);
    assert_eq!(notices.messages(), vec!["getInfo: roles must be a non-null array!"]);
    Ok(())
}

#[tokio::test]
async fn logged_out_token_is_rejected_on_next_fetch() -> Result<()> {
    let server = common::ensure_server().await?;
    let api = api(server)?;

    let old = Arc::new(SessionStore::in_memory());
    old.login(api.as_ref(), "admin", "111111").await?;
    let token = old.token().unwrap_or_default();
    old.logout(api.as_ref()).await?;
    assert_eq!(old.token(), None);

    let session = Arc::new(SessionStore::in_memory());
    session.set_token(&token);
    let notices = Arc::new(MessageLog::new());
    let nav = navigator(api, session.clone(), static_routes(), notices.clone());

    let outcome = nav.push("/system/menu").await?;
    assert_eq!(outcome.location().full_path(), "/login?redirect=%2Fsystem%2Fmenu");
    assert_eq!(session.token(), None);
    assert_eq!(notices.messages().len(), 1);
    Ok(())
}

#[tokio::test]
async fn menu_tree_drives_routes() -> Result<()> {
    let server = common::ensure_server().await?;
    let api = api(server)?;
    let session = Arc::new(SessionStore::in_memory());
    session.login(api.as_ref(), "editor", "111111").await?;

    let fallback = vec![RouteRecord::new("*").redirect("/404").hidden()];
    let generator = Arc::new(MenuRouteGenerator::new(api.clone(), session.clone()).with_fallback(fallback));
    let nav = navigator(api, session, generator, Arc::new(MessageLog::new()));

    let outcome = nav.push("/article/list").await?;
    match &outcome {
        NavigationOutcome::Arrived { route, title, .. } => {
            assert_eq!(route, "/article/list");
            assert_eq!(title, "Article List - Admin Panel");
        }
        other => panic!("expected arrival, got {:?}", other),
    }

    let outcome = nav.push("/system/user").await?;
    assert_eq!(outcome.path(), "/404");
    Ok(())
}
