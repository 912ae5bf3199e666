use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::analyze::{extract_classes, extract_scenario};
use crate::cli::output::Output;
use crate::config::{resolve, Config};
use crate::emit::{
    write_data, ClassData, SequenceData, SequenceEntry, CLASS_DATA_FILE, SEQUENCE_DATA_FILE,
};
use crate::render::{
    build_class_diagram, build_overview_diagram, build_sequence_diagram, BuiltinModel, Renderer,
    StaticModel,
};
use crate::types::{ClassKind, ClassModel};

/// Everything a generation command needs: resolved config, renderer and
/// console reporter.
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub renderer: Renderer,
    pub output: Output,
}

impl Session {
    pub fn new(root: &Path, config: Config, dot_only: bool, output: Output) -> Self {
        let renderer = Renderer::from_config(root, &config, dot_only);
        Self {
            root: root.to_path_buf(),
            config,
            renderer,
            output,
        }
    }
}

/// The four class diagrams plus `class_data.json`.
pub fn run_classes(session: &Session) -> Result<()> {
    let output = &session.output;
    output.header("Class diagrams");

    let spinner = output.spinner("Scanning sources...");
    let classes = extract_classes(&session.root, &session.config);
    spinner.finish_and_clear();

    let entities = subset(&classes, |kind| kind == ClassKind::Entity);
    let controllers = subset(&classes, |kind| kind == ClassKind::Controller);
    let frontend = subset(&classes, |kind| kind.is_frontend());

    output.count("Entities:", entities.len());
    output.count("Controllers:", controllers.len());
    output.count("Frontend types:", frontend.len());

    let diagrams = [
        ("backend_entities", &entities),
        ("backend_controllers", &controllers),
        ("frontend_types", &frontend),
        ("complete_diagram", &classes),
    ];

    for (name, set) in diagrams {
        if set.is_empty() {
            tracing::info!(diagram = name, "no classes, skipping diagram");
            continue;
        }
        let graph = build_class_diagram(set, session.config.dpi);
        let outcome = session
            .renderer
            .render(name, &graph)
            .with_context(|| format!("Failed to write {}", name))?;
        output.outcome(&outcome);
    }

    if classes.is_empty() {
        output.warn("No classes found; check the [sources] directories");
    }

    let data = ClassData::new(&classes);
    let path = write_data(&session.renderer.output_dir, CLASS_DATA_FILE, &data.to_json())
        .context("Failed to write class data")?;
    output.data_file(&path);

    Ok(())
}

fn subset(classes: &[ClassModel], keep: impl Fn(ClassKind) -> bool) -> Vec<ClassModel> {
    classes.iter().filter(|c| keep(c.kind)).cloned().collect()
}

/// One sequence diagram per scenario, the overview, and
/// `sequence_data.json`.
pub fn run_sequence(session: &Session) -> Result<()> {
    let output = &session.output;
    output.header("Sequence diagrams");

    let mut entries = Vec::new();
    for scenario in &session.config.scenarios {
        let spinner = output.spinner(format!("Resolving {}...", scenario.title));
        let model = extract_scenario(&session.root, &session.config, scenario);
        spinner.finish_and_clear();

        if model.endpoints.is_empty() {
            output.warn(&format!("{}: no controller methods found", scenario.title));
        }

        let name = format!("sequence_{}", scenario.name);
        let graph = build_sequence_diagram(&model);
        let outcome = session
            .renderer
            .render(&name, &graph)
            .with_context(|| format!("Failed to write {}", name))?;
        output.outcome(&outcome);

        entries.push(SequenceEntry::new(&model, outcome.path()));
    }

    let overview = build_overview_diagram(&session.config.scenarios);
    let outcome = session
        .renderer
        .render("system_overview", &overview)
        .context("Failed to write system_overview")?;
    output.outcome(&outcome);

    let data = SequenceData::new(entries);
    let path = write_data(
        &session.renderer.output_dir,
        SEQUENCE_DATA_FILE,
        &data.to_json(),
    )
    .context("Failed to write sequence data")?;
    output.data_file(&path);

    Ok(())
}

/// A hand-authored diagram and its variants.
pub fn run_static(session: &Session, model: BuiltinModel) -> Result<()> {
    let output = &session.output;

    let models = &session.config.models;
    let override_path = match model {
        BuiltinModel::Design => models.design.as_deref(),
        BuiltinModel::Domain => models.domain.as_deref(),
        BuiltinModel::UseCase => models.use_case.as_deref(),
    }
    .map(|p| resolve(&session.root, p));

    let diagram = StaticModel::load(model, override_path.as_deref())
        .with_context(|| format!("Failed to load the {} model", model.as_str()))?;
    output.header(&diagram.name);

    let graph = diagram.to_digraph();
    let outcome = session
        .renderer
        .render(&diagram.name, &graph)
        .with_context(|| format!("Failed to write {}", diagram.name))?;
    output.outcome(&outcome);

    for variant in &diagram.variants {
        let outcome = session
            .renderer
            .render_variant(&variant.name, &graph, variant.format, variant.dpi)
            .with_context(|| format!("Failed to write {}", variant.name))?;
        output.outcome(&outcome);
    }

    Ok(())
}

pub fn run_all(session: &Session) -> Result<()> {
    run_classes(session)?;
    run_sequence(session)?;
    for model in [BuiltinModel::Design, BuiltinModel::Domain, BuiltinModel::UseCase] {
        run_static(session, model)?;
    }
    Ok(())
}
