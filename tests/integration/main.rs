#[path = "../common/mod.rs"]
mod common;

mod project_loading;
