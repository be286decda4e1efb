pub mod item;
pub mod tree;

pub use item::MenuItem;
pub use tree::{build_menu_tree, build_menu_tree_from_value, count_nodes, filter_menu_records};
