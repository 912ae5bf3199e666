mod api_calls;
pub mod lang;
mod project;
mod relations;
mod source;

pub use api_calls::find_api_calls;
pub use lang::{find_endpoints, parse_endpoints, ModelParser};
pub use project::{extract_classes, extract_scenario, ScenarioModel};
pub use relations::{infer_relationships, referenced_type_names};
pub use source::strip_comments;
