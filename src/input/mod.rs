pub(crate) mod csv;
pub(crate) mod item;
pub(crate) mod load;

#[cfg(test)]
#[path = "../../tests/unit/input/mod.rs"]
mod tests;
