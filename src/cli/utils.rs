use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::menu::MenuItem;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<i64>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Render a menu tree as indented lines
pub fn format_menu_tree(tree: &[MenuItem]) -> String {
    let mut out = String::new();
    write_level(tree, 0, &mut out);
    out
}

fn write_level(nodes: &[MenuItem], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} [{}]", node.name, node.code));
        if let Some(path) = &node.path {
            out.push_str(&format!(" {}", path));
        }
        if node.is_button() {
            out.push_str(" (button)");
        }
        out.push('\n');
        write_level(&node.children, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_children() {
        let tree = crate::menu::build_menu_tree(vec![
            MenuItem::new("1", "System", 0).with_code("system").with_path("/system"),
            MenuItem::new("2", "Add", 0).with_parent("1").with_code("add").with_kind(MenuItem::BUTTON),
        ]);
        assert_eq!(format_menu_tree(&tree), "System [system] /system\n  Add [add] (button)\n");
    }
}
