//! Login page.

use crate::field::TextField;
use crate::form::{Form, FormText};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

/// Email and password form. Signing in always succeeds after the delay.
#[derive(Debug)]
pub struct LoginPage {
    form: Form,
}

impl LoginPage {
    /// `on_back` runs when the user escapes or a sign-in completes.
    pub fn new(submit_delay_ms: u64, on_back: impl FnMut() + 'static) -> Self {
        let form = Form::new(
            FormText {
                title: "Sign in",
                subtitle: "Welcome back",
                action: "Sign in",
                pending_action: "Signing in…",
            },
            vec![
                TextField::new("Email", "you@example.com"),
                TextField::masked("Password", "••••••••"),
            ],
            submit_delay_ms,
            on_back,
        );
        Self { form }
    }

    pub fn email(&self) -> &str {
        self.form.value(EMAIL)
    }

    pub fn password(&self) -> &str {
        self.form.value(PASSWORD)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormEvent;
    use crate::form::tests::{key, render_rows, type_text};
    use crossterm::event::KeyCode;
    use lumen_core::{Clock, ManualClock};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_login_submit_navigates_back_once() {
        let clock = ManualClock::new(0);
        let back = Rc::new(Cell::new(0));
        let counter = back.clone();
        let mut page = LoginPage::new(1500, move || counter.set(counter.get() + 1));

        type_text(page.form_mut(), "ann@example.com");
        page.form_mut().handle_key(key(KeyCode::Tab), clock.now_ms());
        type_text(page.form_mut(), "secret");
        assert_eq!(page.email(), "ann@example.com");
        assert_eq!(page.password(), "secret");

        let form = page.form_mut();
        assert_eq!(form.handle_key(key(KeyCode::Enter), clock.now_ms()), FormEvent::Submitted);
        for _ in 0..10 {
            clock.advance(100);
            form.handle_key(key(KeyCode::Enter), clock.now_ms());
            form.tick(clock.now_ms());
        }
        assert_eq!(back.get(), 0);

        clock.advance(500);
        assert!(form.tick(clock.now_ms()));
        clock.advance(5_000);
        form.tick(clock.now_ms());
        assert_eq!(back.get(), 1);
    }

    #[test]
    fn test_login_renders_fields() {
        let page = LoginPage::new(1500, || {});
        let screen = render_rows(page.form(), 70, 24).join("\n");
        assert!(screen.contains("Email"));
        assert!(screen.contains("Password"));
        assert!(screen.contains("you@example.com"));
        assert!(screen.contains("[ Sign in ]"));
    }
}
