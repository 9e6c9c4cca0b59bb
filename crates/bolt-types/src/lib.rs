pub mod roles;
pub mod sketch;
pub mod thread;
pub mod topo;

pub use roles::*;
pub use sketch::*;
pub use thread::*;
pub use topo::*;
