mod class_diagram;
pub mod dot;
mod graphviz;
mod sequence;
mod static_model;

pub use class_diagram::{build_class_diagram, record_label};
pub use dot::Digraph;
pub use graphviz::{RenderOutcome, Renderer};
pub use sequence::{build_overview_diagram, build_sequence_diagram};
pub use static_model::{BuiltinModel, StaticModel};
