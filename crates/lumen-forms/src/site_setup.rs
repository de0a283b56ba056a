//! Site setup page.

use crate::field::TextField;
use crate::form::{Form, FormText};

const SITE_NAME: usize = 0;
const SITE_URL: usize = 1;
const ADMIN_EMAIL: usize = 2;
const ADMIN_PASSWORD: usize = 3;

/// New site form: site details plus the first admin account.
#[derive(Debug)]
pub struct SiteSetupPage {
    form: Form,
}

impl SiteSetupPage {
    /// `on_back` runs when the user escapes or site creation completes.
    pub fn new(submit_delay_ms: u64, on_back: impl FnMut() + 'static) -> Self {
        let form = Form::new(
            FormText {
                title: "Set up your site",
                subtitle: "A few details to get started",
                action: "Create site",
                pending_action: "Creating site…",
            },
            vec![
                TextField::new("Site name", "My site"),
                TextField::new("Site URL", "https://example.com"),
                TextField::new("Admin email", "admin@example.com"),
                TextField::masked("Admin password", "••••••••"),
            ],
            submit_delay_ms,
            on_back,
        );
        Self { form }
    }

    pub fn site_name(&self) -> &str {
        self.form.value(SITE_NAME)
    }

    pub fn site_url(&self) -> &str {
        self.form.value(SITE_URL)
    }

    pub fn admin_email(&self) -> &str {
        self.form.value(ADMIN_EMAIL)
    }

    pub fn admin_password(&self) -> &str {
        self.form.value(ADMIN_PASSWORD)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }
}
