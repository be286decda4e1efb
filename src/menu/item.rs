use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Menu or permission record as stored by the roles/permissions API.
///
/// `children` is only ever filled in by the tree builder; whatever a caller
/// puts there is discarded when the tree is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Any JSON number; integral values serialize back as integers
    #[serde(default, deserialize_with = "null_as_default", serialize_with = "serialize_sort")]
    pub sort: f64,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(rename = "type", default = "default_menu_type", deserialize_with = "null_as_menu_type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<MenuItem>,
}

fn default_menu_type() -> String {
    MenuItem::MENU.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_menu_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_menu_type))
}

fn serialize_sort<S>(sort: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if sort.fract() == 0.0 && sort.abs() < 9.0e15 {
        serializer.serialize_i64(*sort as i64)
    } else {
        serializer.serialize_f64(*sort)
    }
}

// Nested children are dropped from a worklist so deep trees cannot exhaust
// the stack on drop.
impl Drop for MenuItem {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl MenuItem {
    pub const MENU: &'static str = "menu";
    pub const BUTTON: &'static str = "button";

    pub fn new(id: impl Into<String>, name: impl Into<String>, sort: impl Into<f64>) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: name.into(),
            path: None,
            component: None,
            icon: None,
            sort: sort.into(),
            parent_id: None,
            kind: Self::MENU.to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Parent id with empty strings treated as absent
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    pub fn is_button(&self) -> bool {
        self.kind == Self::BUTTON
    }
}
