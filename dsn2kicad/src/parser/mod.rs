pub mod dsn;
pub mod dsn_schema;
pub mod keywords;
pub mod sexp;

// Re-export for convenience
pub use dsn::{DsnExtractor, DsnParseError, DsnParser, PinlessNets};
pub use dsn_schema::*;
pub use keywords::{Keyword, KeywordIndex};
pub use sexp::{Node, NodeId, ParseError, SExpParser, SExpTree};
