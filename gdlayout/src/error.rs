use thiserror::Error;

/// A single structural problem found while validating a graph descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: '{field}' is {problem}")]
    Extent { field: &'static str, problem: Problem },
    #[error("Error: No nodes")]
    NoNodes,
    #[error("Error: too many {kind} ({got}, at most {max})")]
    TooMany { kind: &'static str, got: usize, max: usize },
    #[error("Error in node {node}: {axis}-coordinate is {problem}")]
    NodeCoordinate { node: String, axis: char, problem: Problem },
    #[error("Error: node {0} has no id")]
    MissingNodeId(usize),
    #[error("Error: node id {0} is used more than once")]
    DuplicateNode(String),
    #[error("Edge {edge}: {end} {id} is not a node")]
    DanglingEndpoint { edge: usize, end: &'static str, id: String },
    #[error("Edge {edge}: {end} is missing")]
    MissingEndpoint { edge: usize, end: &'static str },
    #[error("Edge {edge}: {got} bends, only {max} allowed.")]
    TooManyBends { edge: usize, got: usize, max: usize },
    #[error("Error in bend {bend} of edge {edge}: {axis}-coordinate is {problem}")]
    BendCoordinate { edge: usize, bend: usize, axis: char, problem: Problem },
}

/// What is wrong with a numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("not a number")]
    NotANumber,
    #[error("not an integer")]
    NotAnInteger,
    #[error("negative")]
    Negative,
    #[error("larger than the grid size")]
    TooLarge,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed graph file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("graph rejected with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl LoadError {
    /// Stable machine-readable code for bindings.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Parse(_) => "json_parse",
            LoadError::Invalid(_) => "invalid_graph",
        }
    }

    /// Human-readable lines, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            LoadError::Parse(e) => vec![e.to_string()],
            LoadError::Invalid(errs) => errs.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_loader_wording() {
        let e = ValidationError::NodeCoordinate { node: "3".into(), axis: 'x', problem: Problem::TooLarge };
        assert_eq!(e.to_string(), "Error in node 3: x-coordinate is larger than the grid size");
        let e = ValidationError::TooManyBends { edge: 0, got: 2, max: 1 };
        assert_eq!(e.to_string(), "Edge 0: 2 bends, only 1 allowed.");
        let e = ValidationError::Extent { field: "width", problem: Problem::Negative };
        assert_eq!(e.to_string(), "Error: 'width' is negative");
    }

    #[test]
    fn load_error_codes() {
        let e = LoadError::Invalid(vec![ValidationError::NoNodes]);
        assert_eq!(e.code(), "invalid_graph");
        assert_eq!(e.messages(), vec!["Error: No nodes".to_string()]);
    }
}
