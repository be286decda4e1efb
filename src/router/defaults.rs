//! Built-in route definitions for the admin panel.

use super::route::RouteRecord;

/// Routes every visitor has, registered at startup
pub fn constant_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/login").named("Login").component("views/login").title("Login").hidden(),
        RouteRecord::new("/auth-redirect").component("views/login/auth-redirect").hidden(),
        RouteRecord::new("/404").component("views/error-page/404").title("404").hidden(),
        RouteRecord::new("/401").component("views/error-page/401").title("401").hidden(),
        RouteRecord::new("/")
            .component("layout")
            .redirect("/dashboard")
            .child(
                RouteRecord::new("dashboard")
                    .named("Dashboard")
                    .component("views/dashboard")
                    .title("Dashboard")
                    .icon("dashboard"),
            ),
        RouteRecord::new("/profile")
            .component("layout")
            .redirect("/profile/index")
            .hidden()
            .child(
                RouteRecord::new("index")
                    .named("Profile")
                    .component("views/profile")
                    .title("Profile")
                    .icon("user"),
            ),
    ]
}

/// Routes added at runtime once the session's roles are known. The trailing
/// catch-all must stay last.
pub fn async_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/permission")
            .named("Permission")
            .component("layout")
            .redirect("/permission/page")
            .title("Permission")
            .icon("lock")
            .roles(["admin", "editor"])
            .child(
                RouteRecord::new("page")
                    .named("PagePermission")
                    .component("views/permission/page")
                    .title("Page Permission")
                    .roles(["admin"]),
            )
            .child(
                RouteRecord::new("directive")
                    .named("DirectivePermission")
                    .component("views/permission/directive")
                    .title("Directive Permission"),
            )
            .child(
                RouteRecord::new("role")
                    .named("RolePermission")
                    .component("views/permission/role")
                    .title("Role Permission")
                    .roles(["admin"]),
            ),
        RouteRecord::new("/system")
            .named("System")
            .component("layout")
            .redirect("/system/menu")
            .title("System")
            .icon("setting")
            .roles(["admin"])
            .child(
                RouteRecord::new("menu")
                    .named("MenuManagement")
                    .component("views/system/menu")
                    .title("Menus"),
            )
            .child(
                RouteRecord::new("user")
                    .named("UserManagement")
                    .component("views/system/user")
                    .title("Users"),
            ),
        RouteRecord::new("/article")
            .named("Article")
            .component("layout")
            .redirect("/article/list")
            .title("Articles")
            .icon("documentation")
            .child(
                RouteRecord::new("list")
                    .named("ArticleList")
                    .component("views/article/list")
                    .title("Article List"),
            )
            .child(
                RouteRecord::new("edit/:id")
                    .named("EditArticle")
                    .component("views/article/edit")
                    .title("Edit Article")
                    .hidden(),
            ),
        RouteRecord::new("/upload")
            .component("layout")
            .child(
                RouteRecord::new("index")
                    .named("Upload")
                    .component("views/upload")
                    .title("Upload")
                    .icon("upload"),
            ),
        RouteRecord::new("*").redirect("/404").hidden(),
    ]
}
