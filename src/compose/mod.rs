pub(crate) mod background;
pub(crate) mod layout;

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod layout_tests;

#[cfg(test)]
#[path = "../../tests/unit/compose/background.rs"]
mod background_tests;
