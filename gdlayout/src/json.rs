use crate::error::{LoadError, Problem, ValidationError};
use crate::geometry::limits::{self, DEFAULT_EXTENT, MAX_BENDS_TOTAL, MAX_EDGES, MAX_NODES};
use crate::model::{Bend, Edge, ExternalId, Graph, Node};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

#[derive(Deserialize)]
struct DocIn {
    #[serde(default)]
    nodes: Vec<NodeIn>,
    #[serde(default)]
    edges: Vec<EdgeIn>,
    #[serde(default)]
    width: Option<Value>,
    #[serde(default)]
    height: Option<Value>,
    #[serde(default)]
    bends: Option<Value>,
}

#[derive(Deserialize)]
struct NodeIn {
    #[serde(default)]
    id: Option<ExternalId>,
    #[serde(default)]
    x: Value,
    #[serde(default)]
    y: Value,
}

#[derive(Deserialize)]
struct EdgeIn {
    #[serde(default)]
    id: Option<ExternalId>,
    #[serde(default)]
    source: Option<ExternalId>,
    #[serde(default)]
    target: Option<ExternalId>,
    #[serde(default)]
    bends: Vec<PointIn>,
}

#[derive(Deserialize)]
struct PointIn {
    #[serde(default)]
    x: Value,
    #[serde(default)]
    y: Value,
}

/// Non-negative integer no larger than `max`.
fn check_coord(v: &Value, max: f64) -> Result<f64, Problem> {
    let n = v.as_f64().ok_or(Problem::NotANumber)?;
    if !limits::is_integral(n) {
        return Err(Problem::NotAnInteger);
    }
    if n < 0.0 {
        return Err(Problem::Negative);
    }
    if n > max {
        return Err(Problem::TooLarge);
    }
    Ok(n)
}

/// Looks up a node id. An integer and its decimal text name the same node.
fn resolve(dict: &HashMap<ExternalId, usize>, id: &ExternalId) -> Option<usize> {
    if let Some(&i) = dict.get(id) {
        return Some(i);
    }
    let alt = match id {
        ExternalId::Int(n) => ExternalId::Text(n.to_string()),
        ExternalId::Text(s) => {
            let n: i64 = s.parse().ok()?;
            if n.to_string() != *s {
                return None;
            }
            ExternalId::Int(n)
        }
    };
    dict.get(&alt).copied()
}

fn endpoint(
    dict: &HashMap<ExternalId, usize>,
    edge: usize,
    end: &'static str,
    id: Option<&ExternalId>,
    errors: &mut Vec<ValidationError>,
) -> Option<usize> {
    let Some(id) = id else {
        errors.push(ValidationError::MissingEndpoint { edge, end });
        return None;
    };
    let found = resolve(dict, id);
    if found.is_none() {
        errors.push(ValidationError::DanglingEndpoint { edge, end, id: id.to_string() });
    }
    found
}

fn check_extent(
    field: &'static str,
    v: Option<&Value>,
    default: f64,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    match v {
        None => Some(default),
        Some(v) => match check_coord(v, limits::MAX_EXACT_INT) {
            Ok(n) => Some(n),
            Err(problem) => {
                errors.push(ValidationError::Extent { field, problem });
                None
            }
        },
    }
}

/// Parses and validates a graph descriptor. All problems are reported together.
pub fn parse_descriptor(text: &str) -> Result<Graph, LoadError> {
    let doc: DocIn = serde_json::from_str(text)?;
    build_graph(doc)
}

pub fn graph_from_value(v: Value) -> Result<Graph, LoadError> {
    let doc: DocIn = serde_json::from_value(v)?;
    build_graph(doc)
}

fn build_graph(doc: DocIn) -> Result<Graph, LoadError> {
    let mut errors = Vec::new();
    let width = check_extent("width", doc.width.as_ref(), DEFAULT_EXTENT, &mut errors);
    let height = check_extent("height", doc.height.as_ref(), DEFAULT_EXTENT, &mut errors);
    let max_bends = check_extent("bends", doc.bends.as_ref(), 0.0, &mut errors);
    // an invalid extent is already reported; skip the size comparison against it
    let (wmax, hmax) = (width.unwrap_or(f64::INFINITY), height.unwrap_or(f64::INFINITY));

    if doc.nodes.is_empty() {
        errors.push(ValidationError::NoNodes);
    }
    if doc.nodes.len() > MAX_NODES {
        errors.push(ValidationError::TooMany { kind: "nodes", got: doc.nodes.len(), max: MAX_NODES });
    }
    if doc.edges.len() > MAX_EDGES {
        errors.push(ValidationError::TooMany { kind: "edges", got: doc.edges.len(), max: MAX_EDGES });
    }
    let total_bends: usize = doc.edges.iter().map(|e| e.bends.len()).sum();
    if total_bends > MAX_BENDS_TOTAL {
        errors.push(ValidationError::TooMany { kind: "bends", got: total_bends, max: MAX_BENDS_TOTAL });
    }
    if !errors.iter().all(|e| matches!(e, ValidationError::Extent { .. })) {
        return Err(LoadError::Invalid(errors));
    }

    let mut graph = Graph {
        width: width.unwrap_or(DEFAULT_EXTENT),
        height: height.unwrap_or(DEFAULT_EXTENT),
        bends: max_bends.unwrap_or(0.0) as usize,
        ..Graph::default()
    };
    let mut dict: HashMap<ExternalId, usize> = HashMap::with_capacity(doc.nodes.len());
    for (index, n) in doc.nodes.into_iter().enumerate() {
        let label = match &n.id {
            Some(id) => id.to_string(),
            None => {
                errors.push(ValidationError::MissingNodeId(index));
                format!("#{}", index)
            }
        };
        let x = check_coord(&n.x, wmax).map_err(|problem| ValidationError::NodeCoordinate {
            node: label.clone(), axis: 'x', problem,
        });
        let y = check_coord(&n.y, hmax).map_err(|problem| ValidationError::NodeCoordinate {
            node: label.clone(), axis: 'y', problem,
        });
        let (x, y) = match (x, y) {
            (Ok(x), Ok(y)) => (x, y),
            (x, y) => {
                errors.extend(x.err());
                errors.extend(y.err());
                (0.0, 0.0)
            }
        };
        let id = match n.id {
            Some(id) => {
                if resolve(&dict, &id).is_some() {
                    errors.push(ValidationError::DuplicateNode(label));
                }
                dict.insert(id.clone(), index);
                id
            }
            None => ExternalId::Text(label),
        };
        graph.nodes.push(Node {
            id, index, x, y, degree: 0, edges: Vec::new(), selected: false, active: false,
        });
    }

    for (j, e) in doc.edges.into_iter().enumerate() {
        let source = endpoint(&dict, j, "source", e.source.as_ref(), &mut errors);
        let target = endpoint(&dict, j, "target", e.target.as_ref(), &mut errors);
        if e.bends.len() > graph.bends {
            errors.push(ValidationError::TooManyBends { edge: j, got: e.bends.len(), max: graph.bends });
        }
        let mut bends = Vec::with_capacity(e.bends.len());
        for (b, p) in e.bends.iter().enumerate() {
            let x = check_coord(&p.x, wmax)
                .map_err(|problem| ValidationError::BendCoordinate { edge: j, bend: b, axis: 'x', problem });
            let y = check_coord(&p.y, hmax)
                .map_err(|problem| ValidationError::BendCoordinate { edge: j, bend: b, axis: 'y', problem });
            match (x, y) {
                (Ok(x), Ok(y)) => {
                    let id = graph.alloc_bend_id(j);
                    bends.push(Bend { id, x, y, selected: false, active: false });
                }
                (x, y) => {
                    errors.extend(x.err());
                    errors.extend(y.err());
                }
            }
        }
        if let (Some(source), Some(target)) = (source, target) {
            graph.nodes[source].degree += 1;
            graph.nodes[source].edges.push(j);
            graph.nodes[target].degree += 1;
            graph.nodes[target].edges.push(j);
            graph.edges.push(Edge { id: e.id, index: j, source, target, bends });
        }
    }

    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }
    debug!(
        "graph loaded: {} nodes, {} edges, {} bends, box {}x{}",
        graph.nodes.len(), graph.edges.len(), graph.bend_count(), graph.width, graph.height
    );
    Ok(graph)
}

#[derive(Serialize)]
struct NodeOut<'a> {
    id: &'a ExternalId,
    x: Value,
    y: Value,
}

#[derive(Serialize)]
struct PointOut {
    x: Value,
    y: Value,
}

#[derive(Serialize)]
struct EdgeOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a ExternalId>,
    source: &'a ExternalId,
    target: &'a ExternalId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bends: Vec<PointOut>,
}

#[derive(Serialize)]
struct DocOut<'a> {
    nodes: Vec<NodeOut<'a>>,
    edges: Vec<EdgeOut<'a>>,
    width: Value,
    height: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    bends: Option<usize>,
}

/// Integral coordinates are written without a fractional part.
fn num(v: f64) -> Value {
    if limits::is_integral(v) && v.abs() <= limits::MAX_EXACT_INT {
        Value::Number(Number::from(v as i64))
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

fn doc_out(g: &Graph) -> DocOut<'_> {
    DocOut {
        nodes: g.nodes.iter().map(|n| NodeOut { id: &n.id, x: num(n.x), y: num(n.y) }).collect(),
        edges: g
            .edges
            .iter()
            .map(|e| EdgeOut {
                id: e.id.as_ref(),
                source: &g.nodes[e.source].id,
                target: &g.nodes[e.target].id,
                bends: e.bends.iter().map(|b| PointOut { x: num(b.x), y: num(b.y) }).collect(),
            })
            .collect(),
        width: num(g.width),
        height: num(g.height),
        bends: (g.bends > 0).then_some(g.bends),
    }
}

/// Descriptor of the current drawing using the original ids.
pub fn to_descriptor(g: &Graph) -> Value {
    serde_json::to_value(doc_out(g)).unwrap_or(Value::Null)
}

/// Descriptor as text, indented by four spaces.
pub fn to_json_string(g: &Graph) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    doc_out(g).serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(r: Result<Graph, LoadError>) -> Vec<String> {
        match r {
            Err(e) => e.messages(),
            Ok(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn defaults_apply() {
        let g = parse_descriptor(r#"{"nodes":[{"id":"a","x":1,"y":2}],"edges":[]}"#).unwrap();
        assert_eq!(g.width, 1_000_000.0);
        assert_eq!(g.height, 1_000_000.0);
        assert_eq!(g.bends, 0);
    }

    #[test]
    fn degrees_and_incidence() {
        let g = parse_descriptor(
            r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":1,"y":1},{"id":2,"x":2,"y":0}],
                "edges":[{"source":0,"target":1},{"source":1,"target":2}]}"#,
        ).unwrap();
        assert_eq!(g.nodes[1].degree, 2);
        assert_eq!(g.nodes[1].edges, vec![0, 1]);
        assert_eq!(g.edges[1].source, 1);
    }

    #[test]
    fn errors_are_collected() {
        let msgs = messages(graph_from_value(json!({
            "width": 10, "height": 10,
            "nodes": [{"id": 0, "x": 11, "y": 1.5}, {"id": 1, "x": -1, "y": "a"}],
            "edges": [{"source": 0, "target": 7, "bends": [{"x": 1, "y": 1}]}]
        })));
        assert_eq!(msgs, vec![
            "Error in node 0: x-coordinate is larger than the grid size",
            "Error in node 0: y-coordinate is not an integer",
            "Error in node 1: x-coordinate is negative",
            "Error in node 1: y-coordinate is not a number",
            "Edge 0: target 7 is not a node",
            "Edge 0: 1 bends, only 0 allowed.",
        ]);
    }

    #[test]
    fn missing_fields_do_not_stop_validation() {
        let msgs = messages(graph_from_value(json!({
            "nodes": [{"id": 0, "x": -1, "y": 0}, {"x": 2, "y": 0.5}],
            "edges": [{"target": 0}, {"source": 0}]
        })));
        assert_eq!(msgs, vec![
            "Error in node 0: x-coordinate is negative",
            "Error: node 1 has no id",
            "Error in node #1: y-coordinate is not an integer",
            "Edge 0: source is missing",
            "Edge 1: target is missing",
        ]);
    }

    #[test]
    fn integer_and_text_ids_match() {
        let g = parse_descriptor(
            r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":"7","x":4,"y":0}],
                "edges":[{"source":"0","target":7}]}"#,
        ).unwrap();
        assert_eq!((g.edges[0].source, g.edges[0].target), (0, 1));
        let v = to_descriptor(&g);
        assert_eq!(v["edges"][0], json!({"source": 0, "target": "7"}));

        let msgs = messages(parse_descriptor(
            r#"{"nodes":[{"id":1,"x":0,"y":0},{"id":"1","x":2,"y":2}],"edges":[{"source":"01","target":1}]}"#,
        ));
        assert_eq!(msgs, vec!["Error: node id 1 is used more than once", "Edge 0: source 01 is not a node"]);
    }

    #[test]
    fn empty_and_bad_extent() {
        let msgs = messages(graph_from_value(json!({"width": -3, "nodes": []})));
        assert_eq!(msgs, vec!["Error: 'width' is negative", "Error: No nodes"]);
    }

    #[test]
    fn syntax_error_is_parse() {
        let err = parse_descriptor("{nodes: ").unwrap_err();
        assert_eq!(err.code(), "json_parse");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let msgs = messages(parse_descriptor(r#"{"nodes":[{"id":1,"x":0,"y":0},{"id":1,"x":2,"y":2}]}"#));
        assert_eq!(msgs, vec!["Error: node id 1 is used more than once"]);
    }

    #[test]
    fn save_omits_internal_fields() {
        let g = parse_descriptor(
            r#"{"nodes":[{"id":"s","x":0,"y":0},{"id":"t","x":4,"y":0}],
                "edges":[{"source":"s","target":"t"}],"width":10,"height":10}"#,
        ).unwrap();
        let v = to_descriptor(&g);
        assert_eq!(v, json!({
            "nodes": [{"id":"s","x":0,"y":0},{"id":"t","x":4,"y":0}],
            "edges": [{"source":"s","target":"t"}],
            "width": 10, "height": 10
        }));
        let text = to_json_string(&g).unwrap();
        assert!(text.contains("\n    \"nodes\""));
    }

    #[test]
    fn bends_written_when_allowed() {
        let g = parse_descriptor(
            r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":4,"y":0}],
                "edges":[{"source":0,"target":1,"bends":[{"x":2,"y":3}]}],"bends":2}"#,
        ).unwrap();
        let v = to_descriptor(&g);
        assert_eq!(v["bends"], json!(2));
        assert_eq!(v["edges"][0]["bends"], json!([{"x":2,"y":3}]));
    }
}
