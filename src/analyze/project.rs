use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::analyze::api_calls::find_api_calls;
use crate::analyze::lang::{
    find_endpoints, JavaControllerParser, JavaEntityParser, ModelParser, TypeScriptParser,
};
use crate::config::{resolve, Config, Scenario};
use crate::scan::{list_source_files, SourceFile};
use crate::types::{ApiCall, ClassModel, Endpoint};

/// Extract every entity, controller and frontend type the config points at.
/// Order: entities, controllers, then frontend types, each by file path.
pub fn extract_classes(root: &Path, config: &Config) -> Vec<ClassModel> {
    let sources = &config.sources;
    let mut classes = Vec::new();

    let entities = list_source_files(
        root,
        &resolve(root, &sources.entity_dir),
        ".java",
        &[],
        config.recursive,
    );
    classes.extend(parse_files(&entities, &JavaEntityParser));

    let controllers = list_source_files(
        root,
        &resolve(root, &sources.controller_dir),
        ".java",
        &[],
        config.recursive,
    );
    classes.extend(parse_files(&controllers, &JavaControllerParser));

    let types = list_source_files(
        root,
        &resolve(root, &sources.types_dir),
        ".ts",
        &[".d.ts"],
        config.recursive,
    );
    classes.extend(parse_files(&types, &TypeScriptParser));

    tracing::info!(
        entities = entities.len(),
        controllers = controllers.len(),
        type_files = types.len(),
        classes = classes.len(),
        "extracted source model"
    );

    classes
}

fn parse_files(files: &[SourceFile], parser: &dyn ModelParser) -> Vec<ClassModel> {
    files
        .iter()
        .filter_map(|file| match fs::read_to_string(&file.path) {
            Ok(content) => Some((file, content)),
            Err(e) => {
                tracing::warn!(path = %file.path.display(), error = %e, "failed to read source file");
                None
            }
        })
        .flat_map(|(file, content)| {
            parser
                .parse_models(&content)
                .into_iter()
                .map(|model| model.with_source(file.relative_path.clone()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Everything a sequence diagram needs for one scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioModel {
    #[serde(rename = "scenario")]
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "methods")]
    pub endpoints: Vec<Endpoint>,
    pub api_calls: Vec<ApiCall>,
}

impl ScenarioModel {
    pub fn calls_for<'a>(&'a self, endpoint: &'a Endpoint) -> impl Iterator<Item = &'a ApiCall> {
        self.api_calls
            .iter()
            .filter(move |c| c.controller_method == endpoint.method_name)
    }
}

/// Resolve a scenario's controller methods and the frontend calls that hit
/// them. A missing controller yields no endpoints; missing view files are
/// skipped.
pub fn extract_scenario(root: &Path, config: &Config, scenario: &Scenario) -> ScenarioModel {
    let controller_path = resolve(root, &config.sources.controller_dir).join(&scenario.controller);

    let endpoints = match fs::read_to_string(&controller_path) {
        Ok(content) => find_endpoints(&content, &scenario.methods),
        Err(e) => {
            tracing::warn!(
                path = %controller_path.display(),
                error = %e,
                "failed to read scenario controller"
            );
            Vec::new()
        }
    };

    let frontend = resolve(root, &config.sources.frontend_dir);
    let mut api_calls = Vec::new();
    for view in &scenario.views {
        let view_path = frontend.join(view);
        let Ok(content) = fs::read_to_string(&view_path) else {
            tracing::debug!(path = %view_path.display(), "view file not found");
            continue;
        };
        let file_name = view_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| view.clone());
        api_calls.extend(find_api_calls(&file_name, &content, &endpoints));
    }

    tracing::info!(
        scenario = %scenario.name,
        endpoints = endpoints.len(),
        api_calls = api_calls.len(),
        "resolved scenario"
    );

    ScenarioModel {
        name: scenario.name.clone(),
        title: scenario.title.clone(),
        description: scenario.description.clone(),
        endpoints,
        api_calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassKind;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture_config() -> Config {
        let mut config = Config::default();
        config.sources.entity_dir = "entity".to_string();
        config.sources.controller_dir = "controller".to_string();
        config.sources.types_dir = "web/types".to_string();
        config.sources.frontend_dir = "web".to_string();
        config
    }

    #[test]
    fn test_extract_classes_from_all_source_sets() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "entity/Task.java", "public class Task { private Project project; }");
        write(root, "entity/Project.java", "public class Project { private String name; }");
        write(
            root,
            "controller/TaskController.java",
            "public class TaskController {\n @GetMapping\n public Result<Task> list() { return null; }\n}",
        );
        write(root, "web/types/task.ts", "export interface TaskVO { id: number }");
        write(root, "web/types/shims.d.ts", "export interface Ignored { id: number }");

        let classes = extract_classes(root, &fixture_config());
        let summary: Vec<(&str, ClassKind)> =
            classes.iter().map(|c| (c.name.as_str(), c.kind)).collect();

        assert_eq!(
            summary,
            vec![
                ("Project", ClassKind::Entity),
                ("Task", ClassKind::Entity),
                ("TaskController", ClassKind::Controller),
                ("TaskVO", ClassKind::Interface),
            ]
        );
        assert_eq!(classes[1].source.as_deref(), Some("entity/Task.java"));
    }

    #[test]
    fn test_extract_classes_with_missing_directories() {
        let temp = TempDir::new().unwrap();
        let classes = extract_classes(temp.path(), &fixture_config());
        assert!(classes.is_empty());
    }

    #[test]
    fn test_extract_scenario_links_views() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            root,
            "controller/TagController.java",
            r#"
@RequestMapping("/tags")
public class TagController {
    @PostMapping
    public Result<Tag> createTag(@RequestBody Tag tag) {
        return Result.success(tagService.create(tag));
    }

    @DeleteMapping("/{id}")
    public Result<Void> deleteTag(@PathVariable Long id) {
        tagService.delete(id);
        return Result.success();
    }
}
"#,
        );
        write(
            root,
            "web/api/tag.ts",
            "export const createTag = (t: Tag) => request.post<Tag>('/tags', t)\n",
        );

        let scenario = Scenario {
            name: "tags".to_string(),
            title: "Tags".to_string(),
            description: String::new(),
            controller: "TagController.java".to_string(),
            methods: vec!["createTag".to_string(), "deleteTag".to_string()],
            views: vec!["api/tag.ts".to_string(), "views/missing.vue".to_string()],
        };

        let model = extract_scenario(root, &fixture_config(), &scenario);
        assert_eq!(model.endpoints.len(), 2);
        assert_eq!(model.endpoints[1].path, "/tags/{id}");
        assert_eq!(model.api_calls.len(), 1);
        assert_eq!(model.api_calls[0].view_file, "tag.ts");
        assert_eq!(model.calls_for(&model.endpoints[0]).count(), 1);
        assert_eq!(model.calls_for(&model.endpoints[1]).count(), 0);
    }

    #[test]
    fn test_extract_scenario_missing_controller() {
        let temp = TempDir::new().unwrap();
        let scenario = &Config::default().scenarios[0];
        let model = extract_scenario(temp.path(), &fixture_config(), scenario);
        assert!(model.endpoints.is_empty());
        assert!(model.api_calls.is_empty());
    }
}
