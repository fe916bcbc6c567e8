pub(crate) mod naming;
pub(crate) mod pipeline;
pub(crate) mod sink;

#[cfg(test)]
#[path = "../../tests/unit/batch/pipeline.rs"]
mod pipeline_tests;
