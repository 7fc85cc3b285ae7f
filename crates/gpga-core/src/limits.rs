//! Fixed limits and reserved labels shared by the graph algorithms

/// Maximum expansion steps of a single ancestor search (1000)
pub const MAX_ANCESTOR_ITERATIONS: usize = 1000;

/// Label returned for node ids that are not in the node map
pub const MISSING_LABEL: &str = "None";

/// Concept marking a question focus
pub const UNKNOWN_CONCEPT: &str = "amr-unknown";

/// Concept of the node holding a named entity's surface strings
pub const NAME_CONCEPT: &str = "name";

/// Relation from an entity to its `name` node
pub const NAME_ROLE: &str = ":name";

/// Counting predicate that redirects unknown-focus detection
pub const COUNT_CONCEPT: &str = "count-01";

/// Pseudo-token appended by parsers at the end of a sentence
pub const ROOT_TOKEN: &str = "<ROOT>";
