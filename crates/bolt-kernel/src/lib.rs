pub mod mock_kernel;
pub mod thread_table;
pub mod traits;
pub mod types;

pub use mock_kernel::{MockKernel, MockOp};
pub use thread_table::ThreadTable;
pub use traits::*;
pub use types::*;
