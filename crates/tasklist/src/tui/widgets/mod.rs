pub(super) mod filter_bar;
pub(super) mod status;
pub(super) mod task_list;
pub(super) mod util;
