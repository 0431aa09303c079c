pub mod notify;
pub mod url_state;
pub mod users_table;

pub use self::notify::{Notification, NotificationKind, Outbox};
pub use self::url_state::{Navigation, UrlState};
pub use self::users_table::{FormFields, ModalState, UsersTable};
