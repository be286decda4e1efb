use serde::{Deserialize, Serialize};

use super::RoleRecord;
use crate::menu::MenuItem;

const AVATAR: &str = "https://wpimg.wallstcn.com/f778738c-e4f8-4870-b634-56703b4acafe.gif";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Initial contents of the store, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub menus: Vec<MenuItem>,
}

fn user(username: &str, name: &str, introduction: &str, roles: &[&str]) -> SeedUser {
    SeedUser {
        username: username.to_string(),
        password: "111111".to_string(),
        name: name.to_string(),
        avatar: AVATAR.to_string(),
        introduction: introduction.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

fn role(code: &str, name: &str, permissions: &[&str]) -> RoleRecord {
    RoleRecord {
        code: code.to_string(),
        name: name.to_string(),
        description: String::new(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

impl Default for Seed {
    fn default() -> Self {
        let menus = vec![
            MenuItem::new("1", "Dashboard", 0).with_code("dashboard").with_path("/dashboard").with_icon("dashboard"),
            MenuItem::new("2", "Permission", 1).with_code("permission").with_path("/permission").with_icon("lock"),
            MenuItem::new("3", "Page Permission", 0)
                .with_parent("2")
                .with_code("permission:page")
                .with_path("page")
                .with_component("views/permission/page"),
            MenuItem::new("4", "Directive Permission", 1)
                .with_parent("2")
                .with_code("permission:directive")
                .with_path("directive")
                .with_component("views/permission/directive"),
            MenuItem::new("5", "System", 9).with_code("system").with_path("/system").with_icon("setting"),
            MenuItem::new("6", "Menus", 0)
                .with_parent("5")
                .with_code("system:menu")
                .with_path("menu")
                .with_component("views/system/menu"),
            MenuItem::new("7", "Add menu", 0)
                .with_parent("6")
                .with_code("system:menu:add")
                .with_kind(MenuItem::BUTTON),
            MenuItem::new("8", "Users", 1)
                .with_parent("5")
                .with_code("system:user")
                .with_path("user")
                .with_component("views/system/user"),
            MenuItem::new("9", "Articles", 2).with_code("article").with_path("/article").with_icon("documentation"),
            MenuItem::new("10", "Article List", 0)
                .with_parent("9")
                .with_code("article:list")
                .with_path("list")
                .with_component("views/article/list"),
            MenuItem::new("11", "Create article", 0)
                .with_parent("10")
                .with_code("article:create")
                .with_kind(MenuItem::BUTTON),
            MenuItem::new("12", "Upload", 3).with_code("upload").with_path("/upload").with_icon("upload"),
        ];

        Self {
            users: vec![
                user("admin", "Super Admin", "I am a super administrator", &["admin"]),
                user("editor", "Normal Editor", "I am an editor", &["editor"]),
                user("visitor", "Visitor", "I have no roles yet", &[]),
            ],
            roles: vec![
                role("admin", "Administrator", &[]),
                role(
                    "editor",
                    "Editor",
                    &[
                        "dashboard",
                        "permission",
                        "permission:directive",
                        "article",
                        "article:list",
                        "article:create",
                        "upload",
                    ],
                ),
            ],
            menus,
        }
    }
}
