mod detail;
mod form;
mod home;
mod list;

pub use detail::{cmd_show_user, render_user_detail};
pub use form::{FormField, FormMode, FormValues, UserForm, cmd_user_form};
pub use home::render_home;
pub use list::{cmd_delete_user, cmd_list_users, render_user_list};
