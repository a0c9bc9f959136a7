mod root;
mod state;

pub(crate) use state::UiAction;

pub use root::{App, build_io_runtime, build_live_engine};
