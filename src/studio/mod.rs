pub(crate) mod command;
pub(crate) mod console;
pub(crate) mod media;
pub(crate) mod sampler;
pub(crate) mod script;
pub(crate) mod session;

#[cfg(test)]
#[path = "../../tests/unit/studio/session.rs"]
mod session_tests;

#[cfg(test)]
#[path = "../../tests/unit/studio/console.rs"]
mod console_tests;
