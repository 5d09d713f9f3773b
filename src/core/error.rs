use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("slab set must contain at least one band")]
    EmptySlabSet,
    #[error("slab upper bounds must be strictly increasing (band {index})")]
    NonIncreasingSlab { index: usize },
    #[error("only the final slab may be unbounded (band {index})")]
    UnboundedSlabNotLast { index: usize },
    #[error("final slab must be unbounded")]
    BoundedFinalSlab,
    #[error("slab rate must be a finite non-negative percentage (band {index})")]
    InvalidSlabRate { index: usize },
    #[error("weekly batch {0} not found")]
    BatchNotFound(String),
    #[error("task {task_id} not found in weekly batch {week_id}")]
    TaskNotFound { week_id: String, task_id: String },
    #[error("learning-module catalog is malformed: {0}")]
    InvalidCatalog(#[source] serde_json::Error),
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("task store payload is not valid JSON: {0}")]
    StoreJson(#[from] serde_json::Error),
}
