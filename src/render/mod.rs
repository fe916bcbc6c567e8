pub(crate) mod blur;
pub(crate) mod cpu;
pub(crate) mod fonts;
pub(crate) mod frame;
pub(crate) mod record;
pub(crate) mod surface;
