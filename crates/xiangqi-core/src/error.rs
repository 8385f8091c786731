use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("malformed position string: {0}")]
    MalformedPosition(String),

    #[error("node {0} not found in tree")]
    NodeNotFound(NodeId),

    #[error("{0}")]
    InvalidOperation(&'static str),

    #[error("could not parse game record")]
    Unparseable,
}
