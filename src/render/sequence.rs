//! Sequence diagrams: numbered messages between fixed participants, laid out
//! left to right.

use crate::analyze::ScenarioModel;
use crate::config::Scenario;
use crate::render::dot::Digraph;
use crate::types::{ApiCall, Endpoint};

const BROWSER: &str = "Browser";
const FRONTEND: &str = "Frontend";
const API: &str = "API";
const CONTROLLER: &str = "Controller";
const SERVICE: &str = "Service";
const DATABASE: &str = "Database";

/// Appends numbered message edges.
struct Messages<'g> {
    graph: &'g mut Digraph,
    count: usize,
}

impl<'g> Messages<'g> {
    fn new(graph: &'g mut Digraph) -> Self {
        Self { graph, count: 0 }
    }

    fn send(&mut self, from: &str, to: &str, text: &str, color: &str) {
        self.count += 1;
        let label = format!("{}. {}", self.count, text);
        self.graph
            .edge(from, to, &[("label", label.as_str()), ("fontcolor", color)]);
    }

    fn reply(&mut self, from: &str, to: &str, text: &str, color: &str) {
        self.count += 1;
        let label = format!("{}. {}", self.count, text);
        self.graph.edge(
            from,
            to,
            &[
                ("label", label.as_str()),
                ("fontcolor", color),
                ("constraint", "false"),
            ],
        );
    }

    /// API Gateway → Controller → Service ⇄ Database, back up to the API.
    fn backend(&mut self, endpoint: &Endpoint) {
        self.send(
            API,
            CONTROLLER,
            &format!("{}.{}()", endpoint.class_name, endpoint.method_name),
            "purple",
        );

        for call in &endpoint.service_calls {
            self.send(
                CONTROLLER,
                SERVICE,
                &format!("{}.{}()", call.receiver(), call.method),
                "brown",
            );
            self.send(SERVICE, DATABASE, "DB operations", "black");
            self.reply(DATABASE, SERVICE, "Return data", "black");
        }

        self.reply(SERVICE, CONTROLLER, "Return result", "brown");
        self.reply(CONTROLLER, API, "JSON response", "purple");
    }

    fn round_trip(&mut self, endpoint: &Endpoint, call: &ApiCall) {
        self.send(
            BROWSER,
            FRONTEND,
            &format!("User action in {}", call.view_file),
            "blue",
        );
        self.send(
            FRONTEND,
            API,
            &format!("{} {}", call.http_method.to_uppercase(), call.path),
            "green",
        );
        self.backend(endpoint);
        self.reply(API, FRONTEND, "HTTP response", "green");
        self.reply(FRONTEND, BROWSER, "Update UI", "blue");
    }
}

fn base_graph(comment: &str, rankdir: &str) -> Digraph {
    let mut graph = Digraph::new().with_comment(comment);
    graph.graph_attr("rankdir", rankdir);
    graph.node_attr("fontname", "Arial");
    graph.node_attr("fontsize", "12");
    graph.edge_attr("fontname", "Arial");
    graph.edge_attr("fontsize", "10");
    graph
}

/// One diagram per scenario. Endpoints with matching frontend calls get the
/// full browser round trip per call; the rest show the backend path only.
pub fn build_sequence_diagram(model: &ScenarioModel) -> Digraph {
    let mut graph = base_graph(&format!("Sequence Diagram: {}", model.title), "LR");

    graph.node(BROWSER, &[("label", "Browser"), ("shape", "box")]);
    graph.node(FRONTEND, &[("label", "Frontend\n(Vue.js)"), ("shape", "box")]);
    graph.node(API, &[("label", "API Gateway"), ("shape", "box")]);
    graph.node(CONTROLLER, &[("label", "Controller"), ("shape", "box")]);
    graph.node(SERVICE, &[("label", "Service"), ("shape", "box")]);
    graph.node(DATABASE, &[("label", "Database"), ("shape", "cylinder")]);

    // Participant order
    let participants = [BROWSER, FRONTEND, API, CONTROLLER, SERVICE, DATABASE];
    for pair in participants.windows(2) {
        graph.edge(pair[0], pair[1], &[("style", "invis")]);
    }

    let mut messages = Messages::new(&mut graph);
    for endpoint in &model.endpoints {
        let calls: Vec<&ApiCall> = model.calls_for(endpoint).collect();
        if calls.is_empty() {
            messages.backend(endpoint);
        } else {
            for call in calls {
                messages.round_trip(endpoint, call);
            }
        }
    }

    graph.graph_attr(
        "label",
        format!("\n\n{}\n{}", model.title, model.description),
    );
    graph.graph_attr("fontsize", "14");

    graph
}

/// Component overview: browser, frontend, gateway, every scenario's
/// controller, the service layer and the database.
pub fn build_overview_diagram(scenarios: &[Scenario]) -> Digraph {
    let mut graph = base_graph("System Interaction Overview", "TB");

    graph.node(BROWSER, &[("label", "Web Browser"), ("shape", "box")]);
    graph.node(FRONTEND, &[("label", "Frontend\n(Vue.js)"), ("shape", "box")]);
    graph.node(API, &[("label", "API Gateway"), ("shape", "box")]);

    let mut controllers: Vec<&str> = Vec::new();
    for scenario in scenarios {
        let name = scenario.controller_name();
        if !controllers.contains(&name) {
            controllers.push(name);
        }
    }
    for controller in &controllers {
        graph.node(*controller, &[("label", *controller), ("shape", "box")]);
    }

    graph.node(SERVICE, &[("label", "Services Layer"), ("shape", "box")]);
    graph.node(DATABASE, &[("label", "Database"), ("shape", "cylinder")]);

    graph.edge(BROWSER, FRONTEND, &[("label", "HTTP/HTTPS")]);
    graph.edge(FRONTEND, API, &[("label", "HTTP/HTTPS\nREST API")]);
    for controller in &controllers {
        graph.edge(API, *controller, &[]);
    }
    for controller in &controllers {
        graph.edge(*controller, SERVICE, &[]);
    }
    graph.edge(SERVICE, DATABASE, &[("label", "JDBC")]);

    graph.graph_attr(
        "label",
        "\n\nSystem Interaction Overview\nMain components and how they interact",
    );
    graph.graph_attr("fontsize", "14");

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_scenarios;
    use crate::types::ServiceCall;

    fn endpoint(name: &str, calls: &[(&str, &str)]) -> Endpoint {
        Endpoint {
            class_name: "TaskController".to_string(),
            method_name: name.to_string(),
            http_method: "GetMapping".to_string(),
            path: "/tasks".to_string(),
            service_calls: calls
                .iter()
                .map(|(s, m)| ServiceCall {
                    service: s.to_string(),
                    method: m.to_string(),
                })
                .collect(),
        }
    }

    fn model(endpoints: Vec<Endpoint>, api_calls: Vec<ApiCall>) -> ScenarioModel {
        ScenarioModel {
            name: "task_management".to_string(),
            title: "Task Management".to_string(),
            description: "Tasks".to_string(),
            endpoints,
            api_calls,
        }
    }

    fn message_labels(graph: &Digraph) -> Vec<String> {
        graph
            .edges
            .iter()
            .filter_map(|e| {
                e.attrs
                    .iter()
                    .find(|(k, _)| k == "label")
                    .map(|(_, v)| v.clone())
            })
            .collect()
    }

    #[test]
    fn test_backend_only_flow() {
        let graph = build_sequence_diagram(&model(
            vec![endpoint("getTaskList", &[("task", "getTaskList")])],
            vec![],
        ));

        assert_eq!(graph.nodes.len(), 6);
        assert_eq!(
            message_labels(&graph),
            vec![
                "1. TaskController.getTaskList()",
                "2. taskService.getTaskList()",
                "3. DB operations",
                "4. Return data",
                "5. Return result",
                "6. JSON response",
            ]
        );
    }

    #[test]
    fn test_full_round_trip_per_call() {
        let call = ApiCall {
            view_file: "list.vue".to_string(),
            api_client: "request".to_string(),
            http_method: "get".to_string(),
            path: "/tasks".to_string(),
            controller_method: "getTaskList".to_string(),
        };
        let graph = build_sequence_diagram(&model(
            vec![endpoint("getTaskList", &[])],
            vec![call],
        ));

        assert_eq!(
            message_labels(&graph),
            vec![
                "1. User action in list.vue",
                "2. GET /tasks",
                "3. TaskController.getTaskList()",
                "4. Return result",
                "5. JSON response",
                "6. HTTP response",
                "7. Update UI",
            ]
        );

        let update_ui = graph.edges.last().unwrap();
        assert_eq!(update_ui.from, FRONTEND);
        assert_eq!(update_ui.to, BROWSER);
        assert!(update_ui
            .attrs
            .contains(&("constraint".to_string(), "false".to_string())));
    }

    #[test]
    fn test_participants_are_ordered_by_invisible_edges() {
        let graph = build_sequence_diagram(&model(vec![], vec![]));
        let invisible: Vec<(&str, &str)> = graph
            .edges
            .iter()
            .filter(|e| e.attrs.contains(&("style".to_string(), "invis".to_string())))
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(invisible.len(), 5);
        assert_eq!(invisible[0], (BROWSER, FRONTEND));
        assert_eq!(invisible[4], (SERVICE, DATABASE));
        assert_eq!(graph.graph_attr_value("rankdir"), Some("LR"));
    }

    #[test]
    fn test_overview_deduplicates_controllers() {
        let graph = build_overview_diagram(&default_scenarios());
        let controllers: Vec<&str> = graph
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| id.ends_with("Controller"))
            .collect();
        assert_eq!(
            controllers,
            vec![
                "UserController",
                "TaskController",
                "ProjectController",
                "FileController"
            ]
        );
        // browser, frontend, api, 4 controllers x 2, service→db
        assert_eq!(graph.edges.len(), 2 + 4 + 4 + 1);
    }
}
