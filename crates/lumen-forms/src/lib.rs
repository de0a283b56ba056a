//! Login and site setup forms.
//!
//! Submission is simulated: after a fixed delay the caller-supplied back
//! callback runs. Nothing is sent anywhere.

mod field;
mod form;
mod login;
mod request;
mod site_setup;

pub use field::TextField;
pub use form::{Form, FormEvent};
pub use login::LoginPage;
pub use request::SimulatedRequest;
pub use site_setup::SiteSetupPage;
