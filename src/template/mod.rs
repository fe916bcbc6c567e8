pub(crate) mod color;
pub(crate) mod descriptor;
pub(crate) mod load;
pub(crate) mod resolve;

#[cfg(test)]
#[path = "../../tests/unit/template/descriptor.rs"]
mod descriptor_tests;
