//! The bundle threaded explicitly through repair instead of the
//! module-level globals the original used for the boundary ids (§9,
//! "Global state").

use crate::config::SortConfig;
use crate::object::DumpId;
use crate::registry::Registry;

pub struct SortContext<'a> {
    pub registry: &'a mut Registry,
    pub pre_boundary: DumpId,
    pub post_boundary: DumpId,
    pub config: SortConfig,
}
