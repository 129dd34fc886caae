pub mod anneal;
pub mod design;
pub mod metrics;
pub mod search;

pub use anneal::{split, AnnealingSplit, SplitMode};
pub use design::{design, DesignOptions, PrimerDesign};
pub use metrics::{gc_content, melting_temp};
pub use search::{find_primers, find_primers_batch, search_windows, PrimerCandidate, SearchConfig, SearchMode};
