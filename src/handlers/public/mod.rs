// Public handlers: no authentication required. Token acquisition only.

pub mod login;

pub use login::login_post;
