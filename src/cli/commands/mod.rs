mod users;

pub use users::{cmd_users_list, cmd_users_reset, cmd_users_upgrade};
