use std::path::PathBuf;

use control_store::ControlStore;
use dispatch::DispatchContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: ControlStore,
    pub(crate) dispatch: DispatchContext,
    pub(crate) static_dir: PathBuf,
    pub(crate) page_template: Option<PathBuf>,
    pub(crate) max_body_bytes: usize,
}
