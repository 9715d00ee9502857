pub mod forms;
pub mod user;

pub use forms::{FieldErrors, OrderFields, OrderFormInput, SignInForm, SignUpForm};
pub use user::{CurrentUser, UserProfile};
