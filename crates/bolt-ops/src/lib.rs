pub mod chamfer;
pub mod diff;
pub mod extrude;
pub mod fillet;
pub mod geometry;
pub mod kernel_ext;
pub mod revolve;
pub mod select;
pub mod sketch;
pub mod thread;
pub mod thread_op;
pub mod types;

pub use chamfer::execute_chamfer;
pub use diff::{snapshot, DiffResult, TopoSnapshot};
pub use extrude::execute_extrude;
pub use fillet::execute_fillet;
pub use geometry::{hex_vertices, revolve_cut_profile, CutSide, HexOutline, RevolveCutProfile};
pub use kernel_ext::KernelBundle;
pub use revolve::execute_revolve;
pub use select::{find_first, SelectError};
pub use sketch::execute_sketch;
pub use thread::{recommend, ThreadRecommendation, ThreadRequest};
pub use thread_op::execute_thread;
pub use types::*;
